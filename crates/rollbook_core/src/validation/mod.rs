//! Field-level validation collaborators.
//!
//! # Responsibility
//! - Check text against Java-style date patterns (`yyyy-MM-dd`).
//! - Collect several violation messages and report them together.

mod collector;
mod date;

pub use collector::ErrorCollector;
pub use date::is_valid_date;

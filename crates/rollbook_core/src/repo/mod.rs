//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the student data access contract.
//! - Isolate SQLite query details from the store lifecycle.
//!
//! # Invariants
//! - Writes run `StudentDraft::validate()` before any SQL mutation.
//! - Missing rows are reported through return values (`None`, `false`),
//!   not errors.

pub mod student_repo;

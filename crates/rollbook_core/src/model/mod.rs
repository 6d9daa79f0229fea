//! Student domain model.
//!
//! # Responsibility
//! - Define the persisted student record and the caller-supplied draft.
//! - Own the field validation rule shared by insert and update.
//!
//! # Invariants
//! - Ids are assigned by storage, never by callers.
//! - Deletion is physical; there is no tombstone state.

pub mod student;

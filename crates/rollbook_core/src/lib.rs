//! Core domain logic for Rollbook.
//! This crate owns the student record invariants and their SQLite storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod seed;
pub mod store;
pub mod validation;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{
    Student, StudentDraft, StudentId, StudentValidationError, Violation, BIRTH_DATE_PATTERN,
};
pub use notify::{CollectingNotificationSink, LogNotificationSink, NotificationSink};
pub use repo::student_repo::{
    RepoError, RepoResult, SqliteStudentRepository, StudentRepository,
};
pub use seed::{seed_sample_records, SeedReport, SAMPLE_STUDENTS};
pub use store::{StoreError, StoreLocation, StoreResult, StudentStore};
pub use validation::{is_valid_date, ErrorCollector};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the student store.
//! - Bring the `students` table to the requested schema version.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Upgrading from an older version drops and recreates `students`;
//!   rows are not carried across versions.
//! - Core code must not read/write student data before bootstrap succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::SCHEMA_VERSION;
pub use open::{
    open_db, open_db_in_memory, open_db_in_memory_with_version, open_db_with_version,
};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Version `0` marks an empty database and cannot be a target.
    InvalidSchemaVersion(u32),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidSchemaVersion(version) => {
                write!(f, "schema version {version} is not a valid target")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidSchemaVersion(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

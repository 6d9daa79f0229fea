//! Student store lifecycle and CRUD entry points.
//!
//! # Responsibility
//! - Own one SQLite connection between explicit `open` and `close` calls.
//! - Route CRUD/search calls through the SQLite repository.
//!
//! # Invariants
//! - `open` on an open store and `close` on a closed store are no-ops.
//! - Every data operation on a closed store fails with [`StoreError::NotOpen`].
//! - No caching: every call queries storage.
//! - Single owner; the store does no internal locking.

use crate::db::{self, DbError, SCHEMA_VERSION};
use crate::model::student::{Student, StudentDraft, StudentId, StudentValidationError};
use crate::repo::student_repo::{RepoError, SqliteStudentRepository, StudentRepository};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by [`StudentStore`].
#[derive(Debug)]
pub enum StoreError {
    /// The store was never opened or has been closed.
    NotOpen,
    Db(DbError),
    Repo(RepoError),
}

impl StoreError {
    /// Returns the field violations when this is a validation failure.
    pub fn validation_error(&self) -> Option<&StudentValidationError> {
        match self {
            Self::Repo(RepoError::Validation(err)) => Some(err),
            _ => None,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "student store is not open"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotOpen => None,
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database; contents vanish on close.
    Memory,
}

impl StoreLocation {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Persistent student record store.
pub struct StudentStore {
    schema_version: u32,
    conn: Option<Connection>,
    location: Option<StoreLocation>,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentStore {
    /// Creates a closed store targeting [`SCHEMA_VERSION`].
    pub fn new() -> Self {
        Self::with_schema_version(SCHEMA_VERSION)
    }

    /// Creates a closed store targeting an explicit schema version.
    ///
    /// Opening a file stored at an older version drops every row.
    pub fn with_schema_version(schema_version: u32) -> Self {
        Self {
            schema_version,
            conn: None,
            location: None,
        }
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Location of the open connection, `None` while closed.
    pub fn location(&self) -> Option<&StoreLocation> {
        self.location.as_ref()
    }

    /// Opens the database at `location`, creating or migrating the schema.
    ///
    /// No-op when already open, even if `location` differs.
    ///
    /// # Errors
    /// - [`StoreError::Db`] when the file cannot be opened, the stored
    ///   schema is newer than the target, or migration fails.
    pub fn open(&mut self, location: StoreLocation) -> StoreResult<()> {
        if self.conn.is_some() {
            debug!(
                "event=store_open module=store status=skipped reason=already_open mode={}",
                location.mode()
            );
            return Ok(());
        }

        let conn = match &location {
            StoreLocation::File(path) => db::open_db_with_version(path, self.schema_version)?,
            StoreLocation::Memory => db::open_db_in_memory_with_version(self.schema_version)?,
        };

        info!(
            "event=store_open module=store status=ok mode={} version={}",
            location.mode(),
            self.schema_version
        );
        self.conn = Some(conn);
        self.location = Some(location);
        Ok(())
    }

    /// Releases the connection. No-op when already closed.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        self.location = None;

        if let Err((_, err)) = conn.close() {
            warn!("event=store_close module=store status=error error={err}");
            return;
        }
        info!("event=store_close module=store status=ok");
    }

    /// Validates and inserts a new student, returning its assigned id.
    pub fn insert(&self, draft: &StudentDraft) -> StoreResult<StudentId> {
        let id = self.repo()?.insert_student(draft).inspect_err(log_write_error("insert"))?;
        debug!("event=student_insert module=store status=ok id={id}");
        Ok(id)
    }

    /// Validates and rewrites every field of `id`.
    ///
    /// Returns `false` when no row has that id; no row is created.
    pub fn update(&self, id: StudentId, draft: &StudentDraft) -> StoreResult<bool> {
        let updated = self
            .repo()?
            .update_student(id, draft)
            .inspect_err(log_write_error("update"))?;
        debug!("event=student_update module=store status=ok id={id} matched={updated}");
        Ok(updated)
    }

    /// Removes `id`. Returns `false` when no row matched.
    pub fn delete(&self, id: StudentId) -> StoreResult<bool> {
        let deleted = self.repo()?.delete_student(id)?;
        debug!("event=student_delete module=store status=ok id={id} matched={deleted}");
        Ok(deleted)
    }

    /// Returns the student with `id`, or `None` when absent.
    pub fn get(&self, id: StudentId) -> StoreResult<Option<Student>> {
        Ok(self.repo()?.get_student(id)?)
    }

    /// Returns students whose name contains `name_fragment`, ignoring case,
    /// ordered by name. Only ASCII letters are case-folded.
    pub fn search(&self, name_fragment: &str) -> StoreResult<Vec<Student>> {
        let students = self.repo()?.search_students(name_fragment)?;
        debug!(
            "event=student_search module=store status=ok hits={}",
            students.len()
        );
        Ok(students)
    }

    pub fn count(&self) -> StoreResult<u64> {
        Ok(self.repo()?.count_students()?)
    }

    fn repo(&self) -> StoreResult<SqliteStudentRepository<'_>> {
        self.conn
            .as_ref()
            .map(SqliteStudentRepository::new)
            .ok_or(StoreError::NotOpen)
    }
}

impl Drop for StudentStore {
    fn drop(&mut self) {
        self.close();
    }
}

fn log_write_error(operation: &'static str) -> impl Fn(&RepoError) {
    move |err: &RepoError| match err {
        RepoError::Validation(validation) => debug!(
            "event=student_{operation} module=store status=rejected violations={}",
            validation.violations.len()
        ),
        other => warn!("event=student_{operation} module=store status=error error={other}"),
    }
}

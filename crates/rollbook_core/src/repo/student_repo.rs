//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/update/delete/get/search over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the whole draft before touching SQL.
//! - Search ordering is `name COLLATE NOCASE ASC`, ties broken by `id`.
//! - Read paths reject rows missing required fields instead of masking them.

use crate::db::migrations::{current_user_version, SCHEMA_VERSION, STUDENTS_TABLE};
use crate::db::DbError;
use crate::model::student::{Student, StudentDraft, StudentId, StudentValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    birthDate,
    email,
    phone,
    notes
FROM students";

const REQUIRED_COLUMNS: &[&str] = &["id", "name", "birthDate", "phone", "email", "notes"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student CRUD and search.
pub trait StudentRepository {
    /// Validates and persists a new row, returning its assigned id.
    fn insert_student(&self, draft: &StudentDraft) -> RepoResult<StudentId>;
    /// Validates and rewrites every field of `id`. `false` when no row matched.
    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<bool>;
    /// Physically removes `id`. `false` when no row matched.
    fn delete_student(&self, id: StudentId) -> RepoResult<bool>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Case-insensitive substring match on `name`; empty matches all.
    ///
    /// Case folding and ordering follow SQLite `LIKE`/`NOCASE`, which fold
    /// ASCII letters only: `JOÃO` does not match `João`, and accented
    /// initials sort after `z`.
    fn search_students(&self, name_fragment: &str) -> RepoResult<Vec<Student>>;
    fn count_students(&self) -> RepoResult<u64>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Wraps a connection without checking its schema.
    ///
    /// Callers must pass a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after verifying it was bootstrapped at
    /// [`SCHEMA_VERSION`] and carries every required column.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, SCHEMA_VERSION)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO students (
                name,
                birthDate,
                email,
                phone,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.name.as_str(),
                draft.birth_date.as_str(),
                draft.email.as_str(),
                draft.phone.as_str(),
                draft.notes.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<bool> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE students
             SET
                name = ?1,
                birthDate = ?2,
                email = ?3,
                phone = ?4,
                notes = ?5
             WHERE id = ?6;",
            params![
                draft.name.as_str(),
                draft.birth_date.as_str(),
                draft.email.as_str(),
                draft.phone.as_str(),
                draft.notes.as_str(),
                id,
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn search_students(&self, name_fragment: &str) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;

        let pattern = format!("%{}%", escape_like(name_fragment));
        let mut rows = stmt.query([pattern])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn count_students(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn ensure_schema(conn: &Connection, expected_version: u32) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [STUDENTS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(STUDENTS_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({STUDENTS_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: STUDENTS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    Ok(Student {
        id,
        name: required_text(row, id, "name")?,
        birth_date: required_text(row, id, "birthDate")?,
        email: required_text(row, id, "email")?,
        phone: row.get::<_, Option<String>>("phone")?.unwrap_or_default(),
        notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
    })
}

fn required_text(row: &Row<'_>, id: StudentId, column: &str) -> RepoResult<String> {
    row.get::<_, Option<String>>(column)?.ok_or_else(|| {
        RepoError::InvalidData(format!("NULL value in students.{column} for id {id}"))
    })
}

/// Escapes LIKE wildcards so the caller's text matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_guards_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("silva"), "silva");
    }
}

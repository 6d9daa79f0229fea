//! Schema bootstrap for the `students` table.
//!
//! # Responsibility
//! - Create the table on a fresh database.
//! - Replace the table when the stored version is older than the target.
//!
//! # Invariants
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Recreation runs in one transaction: either the old table survives
//!   untouched or the new empty table is committed with the new version.
//! - A stored version newer than the target is never touched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

/// Current layout revision of the `students` table.
pub const SCHEMA_VERSION: u32 = 6;

/// Name of the single table owned by the store.
pub const STUDENTS_TABLE: &str = "students";

const CREATE_STUDENTS_SQL: &str = include_str!("students.sql");

/// What [`apply_schema`] did to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaChange {
    /// Stored version already matched the target.
    Unchanged,
    /// Fresh database; table created.
    Created,
    /// Older version found; table dropped and recreated empty.
    Recreated { from: u32 },
}

/// Brings the connection to `target` version.
///
/// # Errors
/// - [`DbError::InvalidSchemaVersion`] when `target` is `0`.
/// - [`DbError::UnsupportedSchemaVersion`] when the stored version is newer.
/// - [`DbError::Sqlite`] for any statement failure; the transaction is rolled back.
pub fn apply_schema(conn: &mut Connection, target: u32) -> DbResult<SchemaChange> {
    if target == 0 {
        return Err(DbError::InvalidSchemaVersion(target));
    }

    if current_user_version(conn)? == target {
        return Ok(SchemaChange::Unchanged);
    }

    // Re-read under the write lock; another connection may have migrated first.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = current_user_version(&tx)?;

    if current > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: target,
        });
    }

    if current == target {
        return Ok(SchemaChange::Unchanged);
    }

    let change = if current == 0 {
        SchemaChange::Created
    } else {
        SchemaChange::Recreated { from: current }
    };

    tx.execute_batch(&format!("DROP TABLE IF EXISTS {STUDENTS_TABLE};"))?;
    tx.execute_batch(CREATE_STUDENTS_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {target};"))?;
    tx.commit()?;

    match change {
        SchemaChange::Created => info!(
            "event=db_migrate module=db status=ok mode=create from=0 to={target}"
        ),
        SchemaChange::Recreated { from } => info!(
            "event=db_migrate module=db status=ok mode=recreate from={from} to={target}"
        ),
        SchemaChange::Unchanged => {}
    }

    Ok(change)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{apply_schema, current_user_version, SchemaChange, SCHEMA_VERSION};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn fresh_database_is_created_at_target_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        let change = apply_schema(&mut conn, SCHEMA_VERSION).unwrap();
        assert_eq!(change, SchemaChange::Created);
        assert_eq!(current_user_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn matching_version_is_left_alone() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, 3).unwrap();
        conn.execute("INSERT INTO students (name) VALUES ('kept')", [])
            .unwrap();

        assert_eq!(apply_schema(&mut conn, 3).unwrap(), SchemaChange::Unchanged);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn older_version_drops_existing_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, 2).unwrap();
        conn.execute("INSERT INTO students (name) VALUES ('lost')", [])
            .unwrap();

        let change = apply_schema(&mut conn, 5).unwrap();
        assert_eq!(change, SchemaChange::Recreated { from: 2 });
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, 9).unwrap();

        let err = apply_schema(&mut conn, 4).unwrap_err();
        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion {
                db_version: 9,
                latest_supported: 4
            }
        ));
        assert_eq!(current_user_version(&conn).unwrap(), 9);
    }

    #[test]
    fn zero_target_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = apply_schema(&mut conn, 0).unwrap_err();
        assert!(matches!(err, DbError::InvalidSchemaVersion(0)));
    }
}

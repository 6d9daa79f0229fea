//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Run schema bootstrap before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have the `students` table at the requested version.
//! - Opening a missing file creates it.

use super::migrations::{apply_schema, SCHEMA_VERSION};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file at the current [`SCHEMA_VERSION`].
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_version(path, SCHEMA_VERSION)
}

/// Opens a SQLite database file and brings it to `schema_version`.
///
/// # Side effects
/// - Creates the file when absent.
/// - Drops and recreates `students` when the stored version is older.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with_version(path: impl AsRef<Path>, schema_version: u32) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file version={schema_version}");

    let conn = Connection::open(path).map_err(|err| {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        err
    })?;

    finish_open(conn, schema_version, "file", started_at)
}

/// Opens an in-memory SQLite database at the current [`SCHEMA_VERSION`].
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db_in_memory_with_version(SCHEMA_VERSION)
}

/// Opens an in-memory SQLite database created at `schema_version`.
pub fn open_db_in_memory_with_version(schema_version: u32) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory version={schema_version}");

    let conn = Connection::open_in_memory().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        err
    })?;

    finish_open(conn, schema_version, "memory", started_at)
}

fn finish_open(
    mut conn: Connection,
    schema_version: u32,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn, schema_version) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, schema_version: u32) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_schema(conn, schema_version)?;
    Ok(())
}

use rollbook_core::db::migrations::current_user_version;
use rollbook_core::db::{open_db, open_db_in_memory, open_db_with_version, SCHEMA_VERSION};
use rollbook_core::{RepoError, SqliteStudentRepository, StudentDraft, StudentRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_students_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), SCHEMA_VERSION);
    let columns = table_columns(&conn, "students");
    assert_eq!(
        columns,
        vec!["id", "name", "birthDate", "phone", "email", "notes"]
    );
}

#[test]
fn opening_same_file_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollbook.db");

    let conn = open_db(&path).unwrap();
    SqliteStudentRepository::try_new(&conn)
        .unwrap()
        .insert_student(&StudentDraft::new("Ann", "1990-01-01", "a@x.com", "", ""))
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_students().unwrap(), 1);
}

#[test]
fn upgrade_from_older_version_recreates_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE students (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);
         INSERT INTO students (name) VALUES ('legacy');
         PRAGMA user_version = 2;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db_with_version(&path, SCHEMA_VERSION).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), SCHEMA_VERSION);
    assert_eq!(table_columns(&conn, "students").len(), 6);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStudentRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, SCHEMA_VERSION),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_students_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();

    assert!(matches!(
        SqliteStudentRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("students"))
    ));
}

#[test]
fn repository_rejects_table_missing_a_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            birthDate TEXT,
            phone TEXT,
            email TEXT
        );
        PRAGMA user_version = {SCHEMA_VERSION};"
    ))
    .unwrap();

    assert!(matches!(
        SqliteStudentRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "students",
            column: "notes"
        })
    ));
}

#[test]
fn null_required_column_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO students (name, birthDate, email) VALUES (NULL, '1990-01-01', 'a@x.com');",
        [],
    )
    .unwrap();

    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let err = repo.get_student(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("students.name")));
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    columns
}

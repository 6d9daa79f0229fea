//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose student CRUD/search as sync functions for Dart via FRB.
//! - Translate core errors into response envelopes with UI-ready messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the store, runs one operation and closes it.

use log::warn;
use rollbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    seed_sample_records, CollectingNotificationSink, StoreConfig, StoreLocation, StoreResult,
    Student, StudentDraft, StudentStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;

static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
/// Safe to repeat with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Student row as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentItem {
    pub id: i64,
    pub name: String,
    /// `yyyy-MM-dd`.
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl From<Student> for StudentItem {
    fn from(value: Student) -> Self {
        Self {
            id: value.id,
            name: value.name,
            birth_date: value.birth_date,
            email: value.email,
            phone: value.phone,
            notes: value.notes,
        }
    }
}

/// Envelope for insert/update/delete/seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentActionResponse {
    pub ok: bool,
    /// Affected student id, when there is one.
    pub student_id: Option<i64>,
    /// Human-readable message for toasts/dialogs.
    pub message: String,
}

impl StudentActionResponse {
    fn success(message: impl Into<String>, student_id: Option<i64>) -> Self {
        Self {
            ok: true,
            student_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            student_id: None,
            message: message.into(),
        }
    }
}

/// Envelope for single-record lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentGetResponse {
    /// `true` when the lookup ran, even if nothing matched.
    pub ok: bool,
    pub student: Option<StudentItem>,
    pub message: String,
}

/// Envelope for name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSearchResponse {
    pub ok: bool,
    /// Matches ordered by name, case-insensitive.
    pub items: Vec<StudentItem>,
    pub message: String,
}

/// Creates a student and returns the assigned id.
///
/// Validation failures list every violated rule in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn student_insert(
    name: String,
    birth_date: String,
    email: String,
    phone: String,
    notes: String,
) -> StudentActionResponse {
    let draft = StudentDraft::new(name, birth_date, email, phone, notes);
    match with_store(|store| store.insert(&draft)) {
        Ok(id) => StudentActionResponse::success("Student created.", Some(id)),
        Err(err) => StudentActionResponse::failure(err),
    }
}

/// Rewrites every field of an existing student.
#[flutter_rust_bridge::frb(sync)]
pub fn student_update(
    id: i64,
    name: String,
    birth_date: String,
    email: String,
    phone: String,
    notes: String,
) -> StudentActionResponse {
    let draft = StudentDraft::new(name, birth_date, email, phone, notes);
    match with_store(|store| store.update(id, &draft)) {
        Ok(true) => StudentActionResponse::success("Student updated.", Some(id)),
        Ok(false) => StudentActionResponse::failure(format!("Student {id} not found.")),
        Err(err) => StudentActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_delete(id: i64) -> StudentActionResponse {
    match with_store(|store| store.delete(id)) {
        Ok(true) => StudentActionResponse::success("Student deleted.", Some(id)),
        Ok(false) => StudentActionResponse::failure(format!("Student {id} not found.")),
        Err(err) => StudentActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_get(id: i64) -> StudentGetResponse {
    match with_store(|store| store.get(id)) {
        Ok(Some(student)) => StudentGetResponse {
            ok: true,
            student: Some(student.into()),
            message: String::new(),
        },
        Ok(None) => StudentGetResponse {
            ok: true,
            student: None,
            message: format!("Student {id} not found."),
        },
        Err(err) => StudentGetResponse {
            ok: false,
            student: None,
            message: err,
        },
    }
}

/// Lists students whose name contains `text`, ignoring ASCII case.
///
/// `text` is matched as given, spaces included; empty `text` lists everyone.
#[flutter_rust_bridge::frb(sync)]
pub fn student_search(text: String) -> StudentSearchResponse {
    match with_store(|store| store.search(&text)) {
        Ok(students) => {
            let items: Vec<StudentItem> = students.into_iter().map(StudentItem::from).collect();
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            StudentSearchResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => StudentSearchResponse {
            ok: false,
            items: Vec::new(),
            message: err,
        },
    }
}

/// Inserts the sample students.
///
/// Partial failures keep the rows already inserted; `message` carries the
/// notification shown to the user.
#[flutter_rust_bridge::frb(sync)]
pub fn student_seed_samples() -> StudentActionResponse {
    let sink = CollectingNotificationSink::new();
    let report = with_store(|store| Ok(seed_sample_records(store, &sink)));

    match report {
        Ok(report) if report.is_complete() => StudentActionResponse::success(
            format!("Created {} sample record(s).", report.inserted.len()),
            None,
        ),
        Ok(_) => StudentActionResponse::failure(sink.take().join("\n")),
        Err(err) => StudentActionResponse::failure(err),
    }
}

fn store_config() -> &'static StoreConfig {
    STORE_CONFIG.get_or_init(StoreConfig::from_env)
}

fn resolve_db_path() -> PathBuf {
    store_config().db_path.clone()
}

fn with_store<T>(f: impl FnOnce(&StudentStore) -> StoreResult<T>) -> Result<T, String> {
    let mut store = StudentStore::new();
    store
        .open(StoreLocation::File(resolve_db_path()))
        .map_err(|err| {
            warn!("event=ffi_store_open module=ffi status=error error={err}");
            format!("store open failed: {err}")
        })?;
    let result = f(&store).map_err(|err| err.to_string());
    store.close();
    result
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, resolve_db_path, student_delete, student_get,
        student_insert, student_search, student_seed_samples, student_update, STORE_CONFIG,
    };
    use rollbook_core::config::default_db_path;
    use rollbook_core::StoreConfig;
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    /// Points the FFI store at a per-run temp file before first use.
    ///
    /// Every test touching the database calls this first so the shared
    /// default file is never written.
    fn use_test_db() -> PathBuf {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create test db dir"));
        let config = STORE_CONFIG.get_or_init(|| StoreConfig {
            db_path: dir.path().join("rollbook_ffi_test.sqlite3"),
            ..StoreConfig::from_env()
        });
        config.db_path.clone()
    }

    #[test]
    fn tests_never_use_default_db_file() {
        let path = use_test_db();
        assert_eq!(path, resolve_db_path());
        assert_ne!(path, default_db_path());
        assert!(path.starts_with(TEST_DB_DIR.get().expect("dir initialized").path()));
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(error.contains("absolute"));
    }

    #[test]
    fn insert_then_get_returns_same_fields() {
        use_test_db();
        let name = unique_token("insert");
        let created = student_insert(
            name.clone(),
            "1990-01-01".to_string(),
            "ann@x.com".to_string(),
            "555".to_string(),
            String::new(),
        );
        assert!(created.ok, "{}", created.message);
        let id = created.student_id.expect("insert should return id");

        let fetched = student_get(id);
        assert!(fetched.ok, "{}", fetched.message);
        let student = fetched.student.expect("student should exist");
        assert_eq!(student.name, name);
        assert_eq!(student.birth_date, "1990-01-01");
        assert_eq!(student.phone, "555");
    }

    #[test]
    fn insert_failure_lists_all_violations() {
        use_test_db();
        let response = student_insert(
            "Bob".to_string(),
            "not-a-date".to_string(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("email must be provided"));
        assert!(response.message.contains("birth date must be valid"));
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        use_test_db();
        let updated = student_update(
            i64::MAX,
            "Ghost".to_string(),
            "1990-01-01".to_string(),
            "g@x.com".to_string(),
            String::new(),
            String::new(),
        );
        assert!(!updated.ok);
        assert!(updated.message.contains("not found"));

        let deleted = student_delete(i64::MAX);
        assert!(!deleted.ok);

        let fetched = student_get(i64::MAX);
        assert!(fetched.ok);
        assert!(fetched.student.is_none());
    }

    #[test]
    fn search_finds_inserted_name_case_insensitively() {
        use_test_db();
        let token = unique_token("search");
        let created = student_insert(
            format!("Maria {token}"),
            "2000-12-31".to_string(),
            "m@x.com".to_string(),
            String::new(),
            String::new(),
        );
        assert!(created.ok, "{}", created.message);

        let response = student_search(token.to_uppercase());
        assert!(response.ok);
        assert_eq!(response.items.len(), 1);
        assert_eq!(Some(response.items[0].id), created.student_id);

        let removed = student_delete(response.items[0].id);
        assert!(removed.ok, "{}", removed.message);
        assert!(student_search(token).items.is_empty());
    }

    #[test]
    fn seed_creates_sample_records() {
        use_test_db();
        let response = student_seed_samples();
        assert!(response.ok, "{}", response.message);

        let conn = rusqlite::Connection::open(use_test_db()).expect("open db");
        let morpheus: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM students WHERE name = 'Morpheus'",
                [],
                |row| row.get(0),
            )
            .expect("count morpheus rows");
        assert!(morpheus >= 1);
    }

    #[test]
    fn search_text_is_not_trimmed() {
        use_test_db();
        let token = unique_token("untrimmed");
        let created = student_insert(
            token.clone(),
            "2000-01-01".to_string(),
            "u@x.com".to_string(),
            String::new(),
            String::new(),
        );
        assert!(created.ok, "{}", created.message);

        assert_eq!(student_search(token.clone()).items.len(), 1);
        assert!(student_search(format!(" {token}")).items.is_empty());
        assert!(student_search(format!("{token} ")).items.is_empty());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

//! Sample data helper.
//!
//! # Responsibility
//! - Insert a fixed set of sample students through the normal insert path.
//!
//! # Invariants
//! - Best effort: no transaction, no rollback, no early stop.
//! - At most one notification per call, sent only when something failed.
//! - Never propagates errors to the caller.

use crate::model::student::{StudentDraft, StudentId};
use crate::notify::NotificationSink;
use crate::store::StudentStore;
use log::{info, warn};

/// Message sent to the sink when any sample insert fails.
pub const SEED_FAILURE_MESSAGE: &str = "failed to create sample records";

const SAMPLE_BIRTH_DATE: &str = "1969-05-23";
const SAMPLE_PHONE: &str = "95452344";
const SAMPLE_NOTES: &str = "Bla bla bla";

/// `(name, email)` pairs of the sample students.
pub const SAMPLE_STUDENTS: [(&str, &str); 10] = [
    ("João da Silva", "joao.silva@gmail.com"),
    ("Alex Krueger Muller", "alex.krueger@gmail.com"),
    ("Cristiane da Silva", "cristiane.silva@gmail.com"),
    ("Rasmus Lerdof", "rasmus@php.net"),
    ("Morpheus", "morpheus@zion.com"),
    ("Mickey Mouse", "mickey@disney.com"),
    ("Quentin Tarantino", "tarantino@gmail.com"),
    ("Steve Jobs", "steve@apple.com"),
    ("James Tiberius Kirk", "kirk@enterprise.com"),
    ("Padme Amidala", "padme@gmail.com"),
];

/// Outcome of [`seed_sample_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: Vec<StudentId>,
    pub failed: usize,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Returns the sample drafts in insertion order.
pub fn sample_drafts() -> Vec<StudentDraft> {
    SAMPLE_STUDENTS
        .iter()
        .map(|&(name, email)| {
            StudentDraft::new(name, SAMPLE_BIRTH_DATE, email, SAMPLE_PHONE, SAMPLE_NOTES)
        })
        .collect()
}

/// Inserts every sample student, reporting failures once through `sink`.
pub fn seed_sample_records(store: &StudentStore, sink: &dyn NotificationSink) -> SeedReport {
    seed_drafts(store, &sample_drafts(), sink)
}

pub(crate) fn seed_drafts(
    store: &StudentStore,
    drafts: &[StudentDraft],
    sink: &dyn NotificationSink,
) -> SeedReport {
    let mut report = SeedReport::default();

    for draft in drafts {
        match store.insert(draft) {
            Ok(id) => report.inserted.push(id),
            Err(err) => {
                warn!("event=seed_insert module=seed status=error error={err}");
                report.failed += 1;
            }
        }
    }

    if report.is_complete() {
        info!(
            "event=seed module=seed status=ok inserted={}",
            report.inserted.len()
        );
    } else {
        warn!(
            "event=seed module=seed status=partial inserted={} failed={}",
            report.inserted.len(),
            report.failed
        );
        sink.notify(SEED_FAILURE_MESSAGE);
    }

    report
}

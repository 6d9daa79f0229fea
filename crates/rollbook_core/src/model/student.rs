//! Student record and validation rule.
//!
//! # Responsibility
//! - Define [`Student`] (persisted) and [`StudentDraft`] (input).
//! - Collect every violated field rule in one pass.
//!
//! # Invariants
//! - `name` and `email` are non-empty on every write.
//! - `birth_date` matches [`BIRTH_DATE_PATTERN`] on every write.
//! - `phone` and `notes` are free text and may be empty.

use crate::validation::{is_valid_date, ErrorCollector};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row id.
pub type StudentId = i64;

/// Layout accepted for `birth_date`.
pub const BIRTH_DATE_PATTERN: &str = "yyyy-MM-dd";

/// Persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// `yyyy-MM-dd`. Serialized as `birthDate` to match the table column.
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl Student {
    /// Returns the writable fields of this record.
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Field set supplied by callers on insert and update.
///
/// Updates rewrite every field, so a draft is always complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl StudentDraft {
    pub fn new(
        name: impl Into<String>,
        birth_date: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            birth_date: birth_date.into(),
            email: email.into(),
            phone: phone.into(),
            notes: notes.into(),
        }
    }

    /// Checks every field rule and reports all violations together.
    ///
    /// # Errors
    /// - [`StudentValidationError`] listing violations in rule order:
    ///   name, email, birth date.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        let mut violations = Vec::new();
        if self.name.is_empty() {
            violations.push(Violation::MissingName);
        }
        if self.email.is_empty() {
            violations.push(Violation::MissingEmail);
        }
        if !is_valid_date(&self.birth_date, BIRTH_DATE_PATTERN) {
            violations.push(Violation::InvalidBirthDate);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(StudentValidationError { violations })
        }
    }

    /// Builds the persisted record for a storage-assigned `id`.
    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            birth_date: self.birth_date,
            email: self.email,
            phone: self.phone,
            notes: self.notes,
        }
    }
}

/// One violated field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    MissingName,
    MissingEmail,
    InvalidBirthDate,
}

impl Violation {
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingName => "name must be provided",
            Self::MissingEmail => "email must be provided",
            Self::InvalidBirthDate => "birth date must be valid",
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Validation failure carrying every violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentValidationError {
    pub violations: Vec<Violation>,
}

impl StudentValidationError {
    pub fn contains(&self, violation: Violation) -> bool {
        self.violations.contains(&violation)
    }
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut collector = ErrorCollector::new();
        for violation in &self.violations {
            collector.add(violation.message());
        }
        f.write_str(&collector.message())
    }
}

impl Error for StudentValidationError {}

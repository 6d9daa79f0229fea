//! Strict date/time validation against Java-style patterns.
//!
//! # Responsibility
//! - Translate `yyyy`, `MM`, `dd`, `HH`, `mm`, `ss` tokens into a shape
//!   check plus a calendar check.
//!
//! # Invariants
//! - Token widths are exact; `1990-1-1` does not match `yyyy-MM-dd`.
//! - Shape-valid but impossible values (`1990-02-30`) are rejected.
//! - Unknown pattern letters reject every input.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;
use regex::Regex;

/// Returns whether `text` is a real date/time written exactly as `pattern`.
pub fn is_valid_date(text: &str, pattern: &str) -> bool {
    let Some(compiled) = CompiledPattern::compile(pattern) else {
        warn!("event=date_pattern_rejected module=validation status=error pattern={pattern}");
        return false;
    };
    compiled.matches(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    fn from_run(letter: char, width: usize) -> Option<Self> {
        match (letter, width) {
            ('y', 4) => Some(Self::Year),
            ('M', 2) => Some(Self::Month),
            ('d', 2) => Some(Self::Day),
            ('H', 2) => Some(Self::Hour),
            ('m', 2) => Some(Self::Minute),
            ('s', 2) => Some(Self::Second),
            _ => None,
        }
    }

    fn shape(self) -> &'static str {
        match self {
            Self::Year => r"\d{4}",
            _ => r"\d{2}",
        }
    }

    fn chrono_spec(self) -> &'static str {
        match self {
            Self::Year => "%Y",
            Self::Month => "%m",
            Self::Day => "%d",
            Self::Hour => "%H",
            Self::Minute => "%M",
            Self::Second => "%S",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Date,
    Time,
    DateTime,
}

struct CompiledPattern {
    shape: Regex,
    format: String,
    kind: Kind,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Option<Self> {
        let mut shape = String::from("^");
        let mut format = String::new();
        let mut fields: Vec<Field> = Vec::new();

        let chars: Vec<char> = pattern.chars().collect();
        let mut index = 0;
        while index < chars.len() {
            let current = chars[index];
            if current.is_ascii_alphabetic() {
                let width = chars[index..]
                    .iter()
                    .take_while(|&&next| next == current)
                    .count();
                let field = Field::from_run(current, width)?;
                if fields.contains(&field) {
                    return None;
                }
                fields.push(field);
                shape.push_str(field.shape());
                format.push_str(field.chrono_spec());
                index += width;
            } else {
                shape.push_str(&regex::escape(&current.to_string()));
                if current == '%' {
                    format.push_str("%%");
                } else {
                    format.push(current);
                }
                index += 1;
            }
        }
        shape.push('$');

        let has = |field: Field| fields.contains(&field);
        let date_fields = [Field::Year, Field::Month, Field::Day];
        let has_date = date_fields.iter().any(|&field| has(field));
        let has_time = has(Field::Hour) || has(Field::Minute) || has(Field::Second);

        if has_date && !date_fields.iter().all(|&field| has(field)) {
            return None;
        }
        if has_time && !(has(Field::Hour) && has(Field::Minute)) {
            return None;
        }

        let kind = match (has_date, has_time) {
            (true, false) => Kind::Date,
            (false, true) => Kind::Time,
            (true, true) => Kind::DateTime,
            (false, false) => return None,
        };

        Some(Self {
            shape: Regex::new(&shape).ok()?,
            format,
            kind,
        })
    }

    fn matches(&self, text: &str) -> bool {
        if !self.shape.is_match(text) {
            return false;
        }
        match self.kind {
            Kind::Date => NaiveDate::parse_from_str(text, &self.format).is_ok(),
            Kind::Time => NaiveTime::parse_from_str(text, &self.format).is_ok(),
            Kind::DateTime => NaiveDateTime::parse_from_str(text, &self.format).is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_valid_date;

    const ISO: &str = "yyyy-MM-dd";

    #[test]
    fn accepts_well_formed_dates() {
        assert!(is_valid_date("1990-01-01", ISO));
        assert!(is_valid_date("1969-05-23", ISO));
        assert!(is_valid_date("2024-02-29", ISO));
    }

    #[test]
    fn rejects_impossible_calendar_values() {
        assert!(!is_valid_date("1990-02-30", ISO));
        assert!(!is_valid_date("2023-02-29", ISO));
        assert!(!is_valid_date("1990-13-01", ISO));
        assert!(!is_valid_date("1990-00-10", ISO));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(!is_valid_date("", ISO));
        assert!(!is_valid_date("not-a-date", ISO));
        assert!(!is_valid_date("1990-1-1", ISO));
        assert!(!is_valid_date(" 1990-01-01", ISO));
        assert!(!is_valid_date("1990-01-01 ", ISO));
        assert!(!is_valid_date("01/01/1990", ISO));
    }

    #[test]
    fn supports_other_layouts() {
        assert!(is_valid_date("23/05/1969", "dd/MM/yyyy"));
        assert!(is_valid_date("1969-05-23 13:45:10", "yyyy-MM-dd HH:mm:ss"));
        assert!(!is_valid_date("1969-05-23 24:00:00", "yyyy-MM-dd HH:mm:ss"));
        assert!(is_valid_date("08:30", "HH:mm"));
    }

    #[test]
    fn unsupported_patterns_reject_everything() {
        assert!(!is_valid_date("1990-01-01", "yy-MM-dd"));
        assert!(!is_valid_date("1990-01", "yyyy-MM"));
        assert!(!is_valid_date("1990-01-01", "yyyy-MM-dd'T'"));
        assert!(!is_valid_date("anything", ""));
    }
}

//! Backend timestamps, kept as the raw text the database returned.
//!
//! Rows are re-exported verbatim, so the original string is the source of
//! truth. Parsing happens on demand for display, ordering, and date filters;
//! a value that does not parse is still usable as an opaque string.

use std::cmp::Ordering;
use std::fmt;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse RFC 3339 (`Z` or offset) and the Postgres text form
    /// (`2024-05-01 10:00:00.123456+00`). Values without an offset are UTC.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }
        let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
            Some(head) => format!("{}+00:00", head),
            None => raw.to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, fmt) {
                return Some(naive.and_utc());
            }
        }
        None
    }

    /// Calendar date in UTC, if the value parses.
    pub fn date(&self) -> Option<NaiveDate> {
        self.parse().map(|dt| dt.date_naive())
    }

    /// `YYYY-MM-DD HH:MM UTC`, or the raw text when it does not parse.
    pub fn display(&self) -> String {
        match self.parse() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => self.0.clone(),
        }
    }

    /// The first 19 characters of the raw value (date and time to the second).
    pub fn short(&self) -> String {
        self.0.chars().take(19).collect()
    }

    /// Chronological comparison when both sides parse, text comparison otherwise.
    pub fn cmp_instant(&self, other: &Timestamp) -> Ordering {
        match (self.parse(), other.parse()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

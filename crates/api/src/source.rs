// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Where timeline entries come from.
//!
//! The source is chosen once at startup and handed to every handler.

use prtrack_domain::{OwnerRef, TimelineEntry};
use time::Date;
use time::macros::date;

use crate::error::ApiError;

/// The entry source strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntrySource {
    /// Entries are read from and written to the database.
    #[default]
    Database,
    /// A fixed sample timeline. Writes are rejected.
    Demo,
}

/// The sample journey served by the demo source.
///
/// The background check is still pending when Portal 1 arrives, which
/// leaves a gap before the furthest recorded milestone.
const DEMO_TIMELINE: [(&str, Date, Option<&str>); 8] = [
    ("submission", date!(2024 - 11 - 04), Some("Submitted online")),
    ("aor", date!(2024 - 11 - 18), None),
    ("biometrics_request", date!(2024 - 11 - 20), None),
    ("biometrics_complete", date!(2024 - 12 - 03), Some("Service Canada")),
    ("medicals_request", date!(2025 - 01 - 09), None),
    ("medicals_complete", date!(2025 - 01 - 21), None),
    ("background_start", date!(2025 - 02 - 14), None),
    ("p1", date!(2025 - 06 - 02), Some("Portal 1 email received")),
];

impl EntrySource {
    /// Returns the source name used in configuration and messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Demo => "demo",
        }
    }

    /// Returns true if the source rejects writes.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Demo)
    }

    /// Fails with `ApiError::ReadOnlySource` if the source rejects writes.
    ///
    /// # Errors
    ///
    /// Returns an error for read-only sources.
    pub fn ensure_writable(self) -> Result<(), ApiError> {
        if self.is_read_only() {
            return Err(ApiError::ReadOnlySource {
                source_name: self.name().to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for EntrySource {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "demo" => Ok(Self::Demo),
            other => Err(ApiError::InvalidInput {
                field: String::from("data_source"),
                message: format!("'{other}' is not one of: database, demo"),
            }),
        }
    }
}

/// Returns the demo milestone types and dates.
pub(crate) fn demo_milestone_dates() -> impl Iterator<Item = (&'static str, Date)> {
    DEMO_TIMELINE
        .iter()
        .map(|(entry_type, entry_date, _)| (*entry_type, *entry_date))
}

/// Returns the demo timeline as if it belonged to `owner`.
#[must_use]
pub fn demo_entries(owner: &OwnerRef) -> Vec<TimelineEntry> {
    DEMO_TIMELINE
        .iter()
        .map(|(entry_type, entry_date, notes)| {
            TimelineEntry::new(
                owner.clone(),
                entry_type,
                *entry_date,
                notes.map(str::to_string),
            )
        })
        .collect()
}

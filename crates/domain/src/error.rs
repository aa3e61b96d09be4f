// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A catalog was constructed with no milestones.
    EmptyCatalog,
    /// A milestone identifier appears more than once in a catalog.
    DuplicateMilestone(String),
    /// A pairing reference does not point to an earlier milestone.
    InvalidPairing {
        /// The completion-stage milestone carrying the pairing.
        milestone: String,
        /// The referenced request-stage milestone.
        predecessor: String,
    },
    /// The entry type is not a milestone in the catalog.
    UnknownMilestone(String),
    /// The entry date lies after the submission day.
    FutureEntryDate {
        /// The rejected entry date.
        entry_date: time::Date,
        /// The day the entry was submitted.
        today: time::Date,
    },
    /// Notes exceed the maximum permitted length.
    NotesTooLong {
        /// Length of the rejected notes, in characters.
        length: usize,
        /// The maximum permitted length.
        max: usize,
    },
    /// Owner reference is empty or invalid.
    InvalidOwnerRef(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// No entry with this id exists for the owner.
    EntryNotFound(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "Milestone catalog must contain at least one milestone"),
            Self::DuplicateMilestone(id) => {
                write!(f, "Milestone '{id}' appears more than once in the catalog")
            }
            Self::InvalidPairing {
                milestone,
                predecessor,
            } => {
                write!(
                    f,
                    "Milestone '{milestone}' is paired with '{predecessor}', which is not an earlier milestone"
                )
            }
            Self::UnknownMilestone(id) => write!(f, "Unknown milestone type: '{id}'"),
            Self::FutureEntryDate { entry_date, today } => {
                write!(
                    f,
                    "Entry date {entry_date} is in the future (today is {today})"
                )
            }
            Self::NotesTooLong { length, max } => {
                write!(
                    f,
                    "Notes are {length} characters long. Must be at most {max}"
                )
            }
            Self::InvalidOwnerRef(msg) => write!(f, "Invalid owner reference: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::EntryNotFound(id) => write!(f, "Timeline entry {id} not found"),
        }
    }
}

impl std::error::Error for DomainError {}

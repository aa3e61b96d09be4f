// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// A command represents user intent as data only.
///
/// Commands are the only way to request timeline changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a milestone. Replaces an existing entry of the same type.
    RecordMilestone {
        /// The milestone identifier.
        entry_type: String,
        /// The day the milestone occurred.
        entry_date: Date,
        /// Optional free-form notes.
        notes: Option<String>,
    },
    /// Change the date and notes of an existing entry.
    UpdateEntry {
        /// The entry to change.
        entry_id: i64,
        /// The new date.
        entry_date: Date,
        /// The new notes.
        notes: Option<String>,
    },
    /// Remove an entry.
    DeleteEntry {
        /// The entry to remove.
        entry_id: i64,
    },
}

impl Command {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RecordMilestone { .. } => "RecordMilestone",
            Self::UpdateEntry { .. } => "UpdateEntry",
            Self::DeleteEntry { .. } => "DeleteEntry",
        }
    }
}

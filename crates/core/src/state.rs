// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prtrack_domain::{OwnerRef, TimelineEntry};

/// All timeline entries belonging to a single owner.
///
/// Entry order carries no meaning. At most one entry exists per entry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    /// The owner this timeline is scoped to.
    pub owner_ref: OwnerRef,
    /// The owner's entries.
    pub entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Creates an empty timeline for an owner.
    #[must_use]
    pub const fn new(owner_ref: OwnerRef) -> Self {
        Self {
            owner_ref,
            entries: Vec::new(),
        }
    }

    /// Creates a timeline from already-loaded entries.
    #[must_use]
    pub const fn with_entries(owner_ref: OwnerRef, entries: Vec<TimelineEntry>) -> Self {
        Self { owner_ref, entries }
    }

    /// Returns the entry recorded for a milestone type, if any.
    #[must_use]
    pub fn entry_of_type(&self, entry_type: &str) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.entry_type == entry_type)
    }
}

/// What storage must do to match the new timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new entry was added.
    Inserted(TimelineEntry),
    /// An entry of the same type existed and was replaced in place.
    Replaced {
        /// The entry before the replacement.
        previous: TimelineEntry,
        /// The entry after the replacement. Keeps the previous id.
        current: TimelineEntry,
    },
    /// An entry's date or notes changed.
    Updated(TimelineEntry),
    /// An entry was removed.
    Deleted(TimelineEntry),
}

/// The result of a successful timeline transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The timeline after the transition.
    pub new_timeline: Timeline,
    /// The change that produced it.
    pub change: Change,
}

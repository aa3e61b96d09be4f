// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use prtrack_domain::{DomainError, TimelineEntry};

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use state::{Change, Timeline, TransitionResult};

/// Finds the entry with the given id in a timeline.
///
/// This is a read-only lookup used by update and delete paths.
///
/// # Arguments
///
/// * `timeline` - The owner's timeline
/// * `entry_id` - The storage-assigned entry id
///
/// # Errors
///
/// Returns `DomainError::EntryNotFound` if no entry in the timeline carries the id.
pub fn find_entry(timeline: &Timeline, entry_id: i64) -> Result<&TimelineEntry, DomainError> {
    timeline
        .entries
        .iter()
        .find(|e| e.entry_id == Some(entry_id))
        .ok_or(DomainError::EntryNotFound(entry_id))
}

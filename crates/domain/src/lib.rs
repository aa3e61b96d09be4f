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

mod catalog;
mod dates;
mod error;
mod progress;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{CANONICAL_MILESTONES, MilestoneCatalog, MilestoneDefinition, SUBMISSION};
pub use dates::{days_since, format_entry_date, parse_entry_date};
pub use progress::{
    DerivedView, MilestoneState, ViewOptions, VisibleMilestone, compute_completed_index,
    compute_next_milestone, compute_progress_fraction, compute_visible_sequence, derive_view,
};

// Re-export public types
pub use error::DomainError;
pub use types::{OwnerRef, TimelineEntry};
pub use validation::{
    MAX_NOTES_LEN, validate_entry_date, validate_entry_fields, validate_entry_type,
    validate_notes,
};

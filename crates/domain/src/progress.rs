// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Milestone progress derivation.
//!
//! Progress is **computed**, not stored. Every function here is a pure
//! function of an entry snapshot and a catalog: no I/O, no hidden state,
//! and inputs are never mutated. Deleting an entry is handled by simply
//! recomputing from the new snapshot.
//!
//! The journey is a linear state machine over catalog positions. The
//! completed index is the furthest catalog position with a recorded entry,
//! so recording a later milestone before an earlier one jumps progress
//! forward and leaves the skipped milestones as gaps.
//!
//! Malformed input never fails: entries whose type is not in the catalog
//! are ignored, and duplicate entries of one type count as a single match.

use crate::catalog::{MilestoneCatalog, MilestoneDefinition};
use crate::types::TimelineEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::Date;

/// How a visible milestone should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneState {
    /// At or before the completed index, with a recorded entry.
    Completed,
    /// At or before the completed index, but never recorded.
    Gap,
    /// The next actionable milestone.
    Next,
    /// After the completed index and not yet actionable.
    Upcoming,
}

/// A catalog milestone as it appears in the derived sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleMilestone {
    /// The catalog definition.
    pub definition: MilestoneDefinition,
    /// Position in the unfiltered catalog.
    pub position: usize,
    /// True when `position <= completed_index`.
    pub is_completed: bool,
    /// True when an entry of this type exists.
    pub has_entry: bool,
    /// Date of the recorded entry, if any.
    pub entry_date: Option<Date>,
    /// Presentation state.
    pub state: MilestoneState,
}

/// Caller options for `derive_view`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Forces the progress fraction to zero (first-run and demo screens).
    pub force_empty: bool,
}

/// The complete derived view handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    /// Visible milestones in catalog order.
    pub ordered_visible_milestones: Vec<VisibleMilestone>,
    /// Furthest catalog position with an entry. `None` means not started.
    pub completed_index: Option<usize>,
    /// Fraction of the journey completed, in `[0, 1]`.
    pub progress_fraction: f64,
    /// The next actionable milestone. `None` means the journey is finished.
    pub next_milestone: Option<MilestoneDefinition>,
    /// Number of milestones in the catalog, optional ones included.
    pub total_count: usize,
}

impl DerivedView {
    /// Returns the completed index with `-1` meaning "not started".
    #[must_use]
    pub fn completed_index_value(&self) -> i64 {
        self.completed_index
            .map_or(-1, |index| i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// Entry types recorded in a snapshot, restricted to catalog milestones.
///
/// Duplicate entries of one type collapse into a single match that keeps
/// the latest entry date, so the result does not depend on input order.
struct RecordedMilestones<'a> {
    dates: HashMap<&'a str, Date>,
}

impl<'a> RecordedMilestones<'a> {
    fn collect(entries: &'a [TimelineEntry], catalog: &MilestoneCatalog) -> Self {
        let mut dates: HashMap<&'a str, Date> = HashMap::new();
        for entry in entries {
            if catalog.lookup(&entry.entry_type).is_none() {
                continue;
            }
            dates
                .entry(entry.entry_type.as_str())
                .and_modify(|date| *date = (*date).max(entry.entry_date))
                .or_insert(entry.entry_date);
        }
        Self { dates }
    }

    fn contains(&self, id: &str) -> bool {
        self.dates.contains_key(id)
    }

    fn date(&self, id: &str) -> Option<Date> {
        self.dates.get(id).copied()
    }

    fn pairing_met(&self, milestone: &MilestoneDefinition) -> bool {
        milestone
            .pairing_predecessor()
            .is_none_or(|predecessor| self.contains(predecessor))
    }
}

fn completed_index_of(recorded: &RecordedMilestones<'_>, catalog: &MilestoneCatalog) -> Option<usize> {
    let mut completed: Option<usize> = None;
    for (index, milestone) in catalog.all_milestones().iter().enumerate() {
        if recorded.contains(milestone.id()) {
            completed = Some(index);
        }
    }
    completed
}

fn next_milestone_of<'c>(
    recorded: &RecordedMilestones<'_>,
    catalog: &'c MilestoneCatalog,
    completed_index: Option<usize>,
) -> Option<&'c MilestoneDefinition> {
    let start: usize = completed_index.map_or(0, |index| index + 1);
    catalog
        .all_milestones()
        .iter()
        .skip(start)
        .find(|m| recorded.pairing_met(m) && !recorded.contains(m.id()))
}

fn visible_sequence_of(
    recorded: &RecordedMilestones<'_>,
    catalog: &MilestoneCatalog,
    completed_index: Option<usize>,
    next_id: Option<&str>,
) -> Vec<VisibleMilestone> {
    catalog
        .all_milestones()
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            if m.is_optional() && !recorded.contains(m.id()) {
                return false;
            }
            recorded.pairing_met(m)
        })
        .map(|(position, m)| {
            let is_completed: bool = completed_index.is_some_and(|c| position <= c);
            let entry_date: Option<Date> = recorded.date(m.id());
            let has_entry: bool = entry_date.is_some();
            let state: MilestoneState = if is_completed && has_entry {
                MilestoneState::Completed
            } else if is_completed {
                MilestoneState::Gap
            } else if next_id == Some(m.id()) {
                MilestoneState::Next
            } else {
                MilestoneState::Upcoming
            };

            VisibleMilestone {
                definition: *m,
                position,
                is_completed,
                has_entry,
                entry_date,
                state,
            }
        })
        .collect()
}

/// Computes the furthest catalog position that has a recorded entry.
///
/// The scan visits milestones in catalog order and keeps the last match,
/// so an out-of-order entry still advances progress to its position.
///
/// # Returns
///
/// `None` when no entry matches any catalog milestone.
#[must_use]
pub fn compute_completed_index(
    entries: &[TimelineEntry],
    catalog: &MilestoneCatalog,
) -> Option<usize> {
    let recorded = RecordedMilestones::collect(entries, catalog);
    completed_index_of(&recorded, catalog)
}

/// Computes the milestones to display, in catalog order.
///
/// An optional milestone is shown only once it has an entry. A paired
/// completion milestone is hidden until its request milestone has an
/// entry, even if the completion itself was recorded.
#[must_use]
pub fn compute_visible_sequence(
    catalog: &MilestoneCatalog,
    entries: &[TimelineEntry],
) -> Vec<VisibleMilestone> {
    let recorded = RecordedMilestones::collect(entries, catalog);
    let completed: Option<usize> = completed_index_of(&recorded, catalog);
    let next_id: Option<&str> =
        next_milestone_of(&recorded, catalog, completed).map(MilestoneDefinition::id);
    visible_sequence_of(&recorded, catalog, completed, next_id)
}

/// Finds the next actionable milestone after `completed_index`.
///
/// Milestones whose pairing precondition is unmet and milestones that
/// already have an entry are skipped.
///
/// # Returns
///
/// `None` when the journey is finished.
#[must_use]
pub fn compute_next_milestone<'c>(
    catalog: &'c MilestoneCatalog,
    entries: &[TimelineEntry],
    completed_index: Option<usize>,
) -> Option<&'c MilestoneDefinition> {
    let recorded = RecordedMilestones::collect(entries, catalog);
    next_milestone_of(&recorded, catalog, completed_index)
}

/// Computes `(completed_index + 1) / total_count`, clamped to `[0, 1]`.
///
/// Returns `0.0` when `force_empty` is set or the catalog is empty.
#[must_use]
pub fn compute_progress_fraction(
    completed_index: Option<usize>,
    total_count: usize,
    force_empty: bool,
) -> f64 {
    if force_empty || total_count == 0 {
        return 0.0;
    }

    let reached: usize = completed_index.map_or(0, |index| index + 1).min(total_count);
    let reached: u32 = u32::try_from(reached).unwrap_or(u32::MAX);
    let total: u32 = u32::try_from(total_count).unwrap_or(u32::MAX);

    (f64::from(reached) / f64::from(total)).clamp(0.0, 1.0)
}

/// Derives the full view for one owner's entry snapshot.
///
/// The snapshot order is irrelevant. An empty snapshot yields the
/// not-started view.
#[must_use]
pub fn derive_view(
    entries: &[TimelineEntry],
    catalog: &MilestoneCatalog,
    options: ViewOptions,
) -> DerivedView {
    let recorded = RecordedMilestones::collect(entries, catalog);
    let completed_index: Option<usize> = completed_index_of(&recorded, catalog);
    let next_milestone: Option<MilestoneDefinition> =
        next_milestone_of(&recorded, catalog, completed_index).copied();
    let ordered_visible_milestones: Vec<VisibleMilestone> = visible_sequence_of(
        &recorded,
        catalog,
        completed_index,
        next_milestone.as_ref().map(MilestoneDefinition::id),
    );

    DerivedView {
        ordered_visible_milestones,
        completed_index,
        progress_fraction: compute_progress_fraction(
            completed_index,
            catalog.len(),
            options.force_empty,
        ),
        next_milestone,
        total_count: catalog.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OwnerRef;
    use time::macros::date;

    fn owner() -> OwnerRef {
        OwnerRef::new("device-1").unwrap()
    }

    fn entry(entry_type: &str) -> TimelineEntry {
        TimelineEntry::new(owner(), entry_type, date!(2025 - 01 - 15), None)
    }

    fn entries(types: &[&str]) -> Vec<TimelineEntry> {
        types.iter().map(|t| entry(t)).collect()
    }

    fn scenario_catalog() -> MilestoneCatalog {
        MilestoneCatalog::new(vec![
            MilestoneDefinition::new("submission", "Submission", "send", "blue"),
            MilestoneDefinition::new("aor", "AOR", "mail", "indigo"),
            MilestoneDefinition::new("biometrics_request", "Bio Req", "fp", "purple"),
            MilestoneDefinition::new("biometrics_complete", "Bio Done", "fp", "purple")
                .paired_with("biometrics_request"),
            MilestoneDefinition::new("p1", "P1", "door", "teal"),
            MilestoneDefinition::new("p2", "P2", "upload", "cyan"),
            MilestoneDefinition::new("ecopr", "eCoPR", "badge", "green"),
            MilestoneDefinition::new("pr_card", "PR Card", "card", "emerald"),
        ])
        .unwrap()
    }

    fn visible_ids(view: &DerivedView) -> Vec<&'static str> {
        view.ordered_visible_milestones
            .iter()
            .map(|v| v.definition.id())
            .collect()
    }

    #[test]
    fn test_scenario_three_entries() {
        let catalog = scenario_catalog();
        let snapshot = entries(&["submission", "aor", "biometrics_request"]);

        let view = derive_view(&snapshot, &catalog, ViewOptions::default());

        assert_eq!(view.completed_index, Some(2));
        assert!((view.progress_fraction - 0.375).abs() < f64::EPSILON);
        assert_eq!(
            view.next_milestone.map(|m| m.id()),
            Some("biometrics_complete")
        );
        assert_eq!(view.ordered_visible_milestones.len(), 8);

        let states: Vec<MilestoneState> = view
            .ordered_visible_milestones
            .iter()
            .map(|v| v.state)
            .collect();
        assert_eq!(
            states,
            vec![
                MilestoneState::Completed,
                MilestoneState::Completed,
                MilestoneState::Completed,
                MilestoneState::Next,
                MilestoneState::Upcoming,
                MilestoneState::Upcoming,
                MilestoneState::Upcoming,
                MilestoneState::Upcoming,
            ]
        );
    }

    #[test]
    fn test_empty_input_is_not_started() {
        let catalog = MilestoneCatalog::canonical();

        let view = derive_view(&[], catalog, ViewOptions::default());

        assert_eq!(view.completed_index, None);
        assert_eq!(view.completed_index_value(), -1);
        assert!(view.progress_fraction.abs() < f64::EPSILON);
        assert_eq!(view.next_milestone.map(|m| m.id()), Some("submission"));
        assert!(
            view.ordered_visible_milestones
                .iter()
                .all(|v| !v.is_completed && !v.has_entry)
        );
    }

    #[test]
    fn test_empty_input_hides_paired_and_optional_milestones() {
        let view = derive_view(&[], MilestoneCatalog::canonical(), ViewOptions::default());

        assert_eq!(
            visible_ids(&view),
            vec![
                "submission",
                "aor",
                "biometrics_request",
                "medicals_request",
                "background_start",
                "p1",
                "p2",
                "ecopr",
                "pr_card",
            ]
        );
    }

    #[test]
    fn test_derive_view_is_deterministic() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["aor", "submission", "p1", "biometrics_request"]);

        let first = derive_view(&snapshot, catalog, ViewOptions::default());
        let second = derive_view(&snapshot, catalog, ViewOptions::default());

        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_order_does_not_matter() {
        let catalog = MilestoneCatalog::canonical();
        let forward = entries(&["submission", "aor", "biometrics_request"]);
        let reversed = entries(&["biometrics_request", "aor", "submission"]);

        assert_eq!(
            derive_view(&forward, catalog, ViewOptions::default()),
            derive_view(&reversed, catalog, ViewOptions::default())
        );
    }

    #[test]
    fn test_adding_an_entry_never_decreases_progress() {
        let catalog = MilestoneCatalog::canonical();
        let bases: Vec<Vec<TimelineEntry>> = vec![
            Vec::new(),
            entries(&["submission"]),
            entries(&["submission", "aor", "p1"]),
            entries(&["ecopr"]),
            entries(&["biometrics_complete"]),
        ];

        for base in &bases {
            let before: Option<usize> = compute_completed_index(base, catalog);
            for milestone in catalog.all_milestones() {
                let mut extended: Vec<TimelineEntry> = base.clone();
                extended.push(entry(milestone.id()));
                let after: Option<usize> = compute_completed_index(&extended, catalog);
                assert!(
                    before <= after,
                    "adding {} decreased progress from {before:?} to {after:?}",
                    milestone.id()
                );
            }
        }
    }

    #[test]
    fn test_out_of_order_entry_advances_completed_index() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["submission", "p1"]);

        let view = derive_view(&snapshot, catalog, ViewOptions::default());

        assert_eq!(view.completed_index, catalog.position("p1"));
        assert_eq!(view.next_milestone.map(|m| m.id()), Some("p2"));

        let aor = view
            .ordered_visible_milestones
            .iter()
            .find(|v| v.definition.id() == "aor")
            .unwrap();
        assert!(aor.is_completed);
        assert!(!aor.has_entry);
        assert_eq!(aor.state, MilestoneState::Gap);
    }

    #[test]
    fn test_duplicate_types_count_once() {
        let catalog = scenario_catalog();
        let mut snapshot = entries(&["submission", "aor"]);
        snapshot.push(TimelineEntry::new(
            owner(),
            "aor",
            date!(2025 - 03 - 01),
            None,
        ));

        let view = derive_view(&snapshot, &catalog, ViewOptions::default());

        assert_eq!(view.completed_index, Some(1));
        assert_eq!(view.ordered_visible_milestones.len(), 7);
        assert_eq!(
            view.ordered_visible_milestones[1].entry_date,
            Some(date!(2025 - 03 - 01))
        );
    }

    #[test]
    fn test_unknown_entry_types_are_ignored() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["submission", "landing", ""]);

        let view = derive_view(&snapshot, catalog, ViewOptions::default());

        assert_eq!(view.completed_index, Some(0));
        assert_eq!(view.next_milestone.map(|m| m.id()), Some("aor"));
    }

    #[test]
    fn test_completion_without_request_is_hidden_and_not_next() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["submission", "aor", "biometrics_complete"]);

        let view = derive_view(&snapshot, catalog, ViewOptions::default());

        assert!(!visible_ids(&view).contains(&"biometrics_complete"));
        assert_ne!(
            view.next_milestone.map(|m| m.id()),
            Some("biometrics_complete")
        );

        let next = compute_next_milestone(catalog, &snapshot, None);
        assert_eq!(next.map(MilestoneDefinition::id), Some("biometrics_request"));
    }

    #[test]
    fn test_completion_becomes_next_once_request_exists() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["submission", "aor", "biometrics_request"]);

        let completed = compute_completed_index(&snapshot, catalog);
        let next = compute_next_milestone(catalog, &snapshot, completed);

        assert_eq!(next.map(MilestoneDefinition::id), Some("biometrics_complete"));
        assert!(
            compute_visible_sequence(catalog, &snapshot)
                .iter()
                .any(|v| v.definition.id() == "biometrics_complete"
                    && v.state == MilestoneState::Next)
        );
    }

    #[test]
    fn test_next_skips_milestones_that_already_have_entries() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&[
            "submission",
            "aor",
            "biometrics_request",
            "biometrics_complete",
        ]);

        let next = compute_next_milestone(catalog, &snapshot, Some(0));
        assert_eq!(next.map(MilestoneDefinition::id), Some("medicals_request"));

        let snapshot = entries(&["submission", "aor", "biometrics_request"]);
        let next = compute_next_milestone(catalog, &snapshot, Some(0));
        assert_eq!(next.map(MilestoneDefinition::id), Some("biometrics_complete"));
    }

    #[test]
    fn test_optional_milestone_absent_without_entry() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["submission", "aor"]);

        let visible = compute_visible_sequence(catalog, &snapshot);

        assert!(!visible.iter().any(|v| v.definition.id() == "additional_docs"));
    }

    #[test]
    fn test_optional_milestone_present_with_entry() {
        let catalog = MilestoneCatalog::canonical();

        let recorded_docs =
            compute_visible_sequence(catalog, &entries(&["submission", "additional_docs"]));
        let docs = recorded_docs
            .iter()
            .find(|v| v.definition.id() == "additional_docs")
            .unwrap();
        assert!(docs.is_completed);
        assert_eq!(docs.state, MilestoneState::Completed);

        let later = compute_visible_sequence(catalog, &entries(&["additional_docs", "ecopr"]));
        let docs = later
            .iter()
            .find(|v| v.definition.id() == "additional_docs")
            .unwrap();
        assert!(docs.is_completed);
        assert!(docs.has_entry);
    }

    #[test]
    fn test_full_completion() {
        let catalog = MilestoneCatalog::canonical();
        let required: Vec<&str> = catalog
            .all_milestones()
            .iter()
            .filter(|m| !m.is_optional())
            .map(MilestoneDefinition::id)
            .collect();

        let view = derive_view(&entries(&required), catalog, ViewOptions::default());

        assert!((view.progress_fraction - 1.0).abs() < f64::EPSILON);
        assert_eq!(view.next_milestone, None);
        assert_eq!(view.completed_index, Some(catalog.len() - 1));
    }

    #[test]
    fn test_force_empty_zeroes_fraction_only() {
        let catalog = MilestoneCatalog::canonical();
        let snapshot = entries(&["submission", "aor"]);

        let view = derive_view(&snapshot, catalog, ViewOptions { force_empty: true });

        assert!(view.progress_fraction.abs() < f64::EPSILON);
        assert_eq!(view.completed_index, Some(1));
    }

    #[test]
    fn test_progress_fraction_bounds() {
        assert!(compute_progress_fraction(None, 13, false).abs() < f64::EPSILON);
        assert!((compute_progress_fraction(Some(12), 13, false) - 1.0).abs() < f64::EPSILON);
        assert!((compute_progress_fraction(Some(40), 13, false) - 1.0).abs() < f64::EPSILON);
        assert!(compute_progress_fraction(Some(3), 0, false).abs() < f64::EPSILON);
        assert!(compute_progress_fraction(Some(3), 8, true).abs() < f64::EPSILON);
    }
}

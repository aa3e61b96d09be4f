// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::find_entry;
use crate::state::{Change, Timeline, TransitionResult};
use prtrack_domain::{
    DomainError, MilestoneCatalog, TimelineEntry, validate_entry_date, validate_entry_fields,
    validate_notes,
};
use time::Date;

/// Applies a command to an owner's timeline, producing a new timeline and the change.
///
/// Recording a milestone that already has an entry replaces that entry in
/// place, so a timeline never holds two entries of the same type.
///
/// # Arguments
///
/// * `catalog` - The milestone catalog used to validate entry types
/// * `timeline` - The current timeline (immutable)
/// * `command` - The command to apply
/// * `today` - The submission day, used to reject future dates
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new timeline and the change
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The entry type is not in the catalog
/// - The entry date is after `today`
/// - The notes are too long
/// - The referenced entry does not exist in the timeline
pub fn apply(
    catalog: &MilestoneCatalog,
    timeline: &Timeline,
    command: Command,
    today: Date,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::RecordMilestone {
            entry_type,
            entry_date,
            notes,
        } => {
            validate_entry_fields(catalog, &entry_type, entry_date, notes.as_deref(), today)?;

            let (new_timeline, change): (Timeline, Change) =
                if let Some(previous) = timeline.entry_of_type(&entry_type) {
                    let current: TimelineEntry = TimelineEntry {
                        entry_date,
                        notes,
                        ..previous.clone()
                    };
                    let entries: Vec<TimelineEntry> = timeline
                        .entries
                        .iter()
                        .map(|e| {
                            if e.entry_type == entry_type {
                                current.clone()
                            } else {
                                e.clone()
                            }
                        })
                        .collect();
                    (
                        Timeline::with_entries(timeline.owner_ref.clone(), entries),
                        Change::Replaced {
                            previous: previous.clone(),
                            current,
                        },
                    )
                } else {
                    let entry: TimelineEntry = TimelineEntry::new(
                        timeline.owner_ref.clone(),
                        &entry_type,
                        entry_date,
                        notes,
                    );
                    let mut new_timeline: Timeline = timeline.clone();
                    new_timeline.entries.push(entry.clone());
                    (new_timeline, Change::Inserted(entry))
                };

            Ok(TransitionResult {
                new_timeline,
                change,
            })
        }
        Command::UpdateEntry {
            entry_id,
            entry_date,
            notes,
        } => {
            find_entry(timeline, entry_id)?;
            validate_entry_date(entry_date, today)?;
            validate_notes(notes.as_deref())?;

            let mut new_timeline: Timeline = timeline.clone();
            let entry: &mut TimelineEntry = new_timeline
                .entries
                .iter_mut()
                .find(|e| e.entry_id == Some(entry_id))
                .ok_or(DomainError::EntryNotFound(entry_id))?;
            entry.entry_date = entry_date;
            entry.notes = notes;
            let entry: TimelineEntry = entry.clone();

            Ok(TransitionResult {
                new_timeline,
                change: Change::Updated(entry),
            })
        }
        Command::DeleteEntry { entry_id } => {
            let removed: TimelineEntry = find_entry(timeline, entry_id)?.clone();

            let new_timeline: Timeline = Timeline {
                owner_ref: timeline.owner_ref.clone(),
                entries: timeline
                    .entries
                    .iter()
                    .filter(|e| e.entry_id != Some(entry_id))
                    .cloned()
                    .collect(),
            };

            Ok(TransitionResult {
                new_timeline,
                change: Change::Deleted(removed),
            })
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use prtrack::{Change, Command, CoreError, Timeline, TransitionResult, apply};
use prtrack_domain::{
    DerivedView, DomainError, MilestoneCatalog, OwnerRef, SUBMISSION, TimelineEntry,
    ViewOptions, VisibleMilestone, days_since, derive_view, format_entry_date, parse_entry_date,
    validate_entry_date, validate_notes,
};
use prtrack_persistence::{CommunityStatsData, MilestoneStatsData, SqlitePersistence};
use std::collections::BTreeMap;
use time::Date;
use tracing::{debug, info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    CatalogResponse, CommunityStatsResponse, DeleteEntryResponse, EntryInfo, ListEntriesResponse,
    MilestoneInfo, MilestoneStatsInfo, ProgressResponse, RecordMilestoneRequest,
    UpdateEntryRequest, VisibleMilestoneInfo, WriteEntryResponse,
};
use crate::source::{EntrySource, demo_entries, demo_milestone_dates};

/// Describes the milestone catalog.
#[must_use]
pub fn get_catalog(catalog: &MilestoneCatalog) -> CatalogResponse {
    CatalogResponse {
        milestones: catalog
            .all_milestones()
            .iter()
            .enumerate()
            .map(|(position, m)| MilestoneInfo::from_definition(m, position))
            .collect(),
        total_count: catalog.len(),
    }
}

/// Fetches an owner's entry snapshot from the configured source.
///
/// # Errors
///
/// Returns an error if the database read fails.
pub fn fetch_entries(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    owner: &OwnerRef,
) -> Result<Vec<TimelineEntry>, ApiError> {
    match source {
        EntrySource::Database => Ok(persistence.list_entries(owner)?),
        EntrySource::Demo => Ok(demo_entries(owner)),
    }
}

fn entry_info(entry: &TimelineEntry, catalog: &MilestoneCatalog, today: Date) -> EntryInfo {
    EntryInfo {
        entry_id: entry.entry_id,
        entry_type: entry.entry_type.clone(),
        display_name: catalog.display_name_or_raw(&entry.entry_type).to_string(),
        entry_date: format_entry_date(entry.entry_date),
        days_ago: days_since(entry.entry_date, today),
        notes: entry.notes.clone(),
        created_at: entry.created_at.clone(),
        updated_at: entry.updated_at.clone(),
    }
}

/// Lists an owner's entries.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `source` - The configured entry source
/// * `owner` - The requesting owner
/// * `catalog` - The milestone catalog, for display names
/// * `today` - The current day, for "days ago"
///
/// # Errors
///
/// Returns an error if the entries cannot be fetched.
pub fn list_entries(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    owner: &OwnerRef,
    catalog: &MilestoneCatalog,
    today: Date,
) -> Result<ListEntriesResponse, ApiError> {
    let entries: Vec<TimelineEntry> = fetch_entries(persistence, source, owner)?;

    Ok(ListEntriesResponse {
        owner_ref: owner.value().to_string(),
        entries: entries
            .iter()
            .map(|e| entry_info(e, catalog, today))
            .collect(),
    })
}

fn visible_milestone_info(milestone: &VisibleMilestone) -> VisibleMilestoneInfo {
    VisibleMilestoneInfo {
        milestone: MilestoneInfo::from_definition(&milestone.definition, milestone.position),
        is_completed: milestone.is_completed,
        has_entry: milestone.has_entry,
        entry_date: milestone.entry_date.map(format_entry_date),
        state: milestone.state,
    }
}

/// Derives the progress view for an entry snapshot.
///
/// This never fails: unknown entry types are ignored and an empty
/// snapshot yields the not-started view.
#[must_use]
pub fn get_progress(
    entries: &[TimelineEntry],
    catalog: &MilestoneCatalog,
    force_empty: bool,
) -> ProgressResponse {
    let view: DerivedView = derive_view(entries, catalog, ViewOptions { force_empty });

    let next_milestone: Option<MilestoneInfo> = view.next_milestone.as_ref().map(|m| {
        MilestoneInfo::from_definition(m, catalog.position(m.id()).unwrap_or_default())
    });

    ProgressResponse {
        completed_index: view.completed_index_value(),
        progress_fraction: view.progress_fraction,
        next_milestone,
        total_count: view.total_count,
        milestones: view
            .ordered_visible_milestones
            .iter()
            .map(visible_milestone_info)
            .collect(),
    }
}

/// Fetches an owner's entries and derives their progress view.
///
/// A failed fetch is reported as an error; it is never turned into an
/// empty snapshot.
///
/// # Errors
///
/// Returns an error if the entries cannot be fetched.
pub fn get_owner_progress(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    owner: &OwnerRef,
    catalog: &MilestoneCatalog,
    force_empty: bool,
) -> Result<ProgressResponse, ApiError> {
    let entries: Vec<TimelineEntry> = fetch_entries(persistence, source, owner)?;
    let response: ProgressResponse = get_progress(&entries, catalog, force_empty);

    debug!(
        owner = %owner,
        completed_index = response.completed_index,
        visible = response.milestones.len(),
        "Derived progress view"
    );

    Ok(response)
}

/// What a timeline command did to storage.
struct CommandOutcome {
    entry_id: i64,
    entry_type: String,
    replaced: bool,
}

/// Loads the owner's timeline, applies a command and persists the change.
fn execute_command(
    persistence: &mut SqlitePersistence,
    owner: &OwnerRef,
    catalog: &MilestoneCatalog,
    command: Command,
    today: Date,
) -> Result<CommandOutcome, ApiError> {
    let command_name: &'static str = command.name();
    let timeline: Timeline = persistence.load_timeline(owner)?;
    debug!(
        owner = %owner,
        entries = timeline.entries.len(),
        "Loaded timeline snapshot"
    );

    let result: TransitionResult = match apply(catalog, &timeline, command.clone(), today) {
        Ok(result) => result,
        Err(CoreError::DomainViolation(DomainError::EntryNotFound(entry_id))) => {
            return write_unreadable_entry(persistence, owner, command, entry_id, today);
        }
        Err(e) => return Err(translate_core_error(e)),
    };
    let entry_id: i64 = persistence.persist_transition(&result)?;

    let (entry_type, replaced): (String, bool) = match result.change {
        Change::Replaced { current, .. } => (current.entry_type, true),
        Change::Inserted(entry) | Change::Updated(entry) | Change::Deleted(entry) => {
            (entry.entry_type, false)
        }
    };

    info!(owner = %owner, command = command_name, entry_id, "Applied timeline command");
    Ok(CommandOutcome {
        entry_id,
        entry_type,
        replaced,
    })
}

/// Updates or deletes an entry that storage holds but the snapshot lacks.
///
/// Rows with an unparseable stored date are left out of the snapshot. An
/// update writes a valid date and so repairs the row.
fn write_unreadable_entry(
    persistence: &mut SqlitePersistence,
    owner: &OwnerRef,
    command: Command,
    entry_id: i64,
    today: Date,
) -> Result<CommandOutcome, ApiError> {
    let not_found = || translate_domain_error(DomainError::EntryNotFound(entry_id));

    let Some(entry_type) = persistence.stored_entry_type(owner, entry_id)? else {
        return Err(not_found());
    };

    let command_name: &'static str = command.name();
    match command {
        Command::UpdateEntry {
            entry_date, notes, ..
        } => {
            validate_entry_date(entry_date, today).map_err(translate_domain_error)?;
            validate_notes(notes.as_deref()).map_err(translate_domain_error)?;
            persistence.update_entry(owner, entry_id, entry_date, notes.as_deref())?;
        }
        Command::DeleteEntry { .. } => persistence.delete_entry(owner, entry_id)?,
        Command::RecordMilestone { .. } => return Err(not_found()),
    }

    warn!(
        owner = %owner,
        command = command_name,
        entry_id,
        entry_type = %entry_type,
        "Applied timeline command to unreadable stored entry"
    );
    Ok(CommandOutcome {
        entry_id,
        entry_type,
        replaced: false,
    })
}

/// Records a milestone, replacing an existing entry of the same type.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `source` - The configured entry source
/// * `owner` - The requesting owner
/// * `catalog` - The milestone catalog
/// * `request` - The record request
/// * `today` - The current day; later entry dates are rejected
///
/// # Errors
///
/// Returns an error if:
/// - The source is read-only
/// - The date cannot be parsed or is in the future
/// - The milestone type is unknown
/// - The notes are too long
/// - Storage fails
pub fn record_milestone(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    owner: &OwnerRef,
    catalog: &MilestoneCatalog,
    request: RecordMilestoneRequest,
    today: Date,
) -> Result<WriteEntryResponse, ApiError> {
    source.ensure_writable()?;

    let entry_date: Date = parse_entry_date(&request.entry_date).map_err(translate_domain_error)?;
    let command: Command = Command::RecordMilestone {
        entry_type: request.entry_type.trim().to_string(),
        entry_date,
        notes: request.notes,
    };

    let outcome: CommandOutcome = execute_command(persistence, owner, catalog, command, today)?;
    let verb: &str = if outcome.replaced {
        "Updated"
    } else {
        "Recorded"
    };

    Ok(WriteEntryResponse {
        entry_id: outcome.entry_id,
        message: format!(
            "{verb} {}",
            catalog.display_name_or_raw(&outcome.entry_type)
        ),
        entry_type: outcome.entry_type,
    })
}

/// Changes the date and notes of an existing entry.
///
/// # Errors
///
/// Returns an error if:
/// - The source is read-only
/// - The date cannot be parsed or is in the future
/// - The notes are too long
/// - The owner has no entry with this id
/// - Storage fails
pub fn update_entry(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    owner: &OwnerRef,
    catalog: &MilestoneCatalog,
    entry_id: i64,
    request: UpdateEntryRequest,
    today: Date,
) -> Result<WriteEntryResponse, ApiError> {
    source.ensure_writable()?;

    let entry_date: Date = parse_entry_date(&request.entry_date).map_err(translate_domain_error)?;
    let command: Command = Command::UpdateEntry {
        entry_id,
        entry_date,
        notes: request.notes,
    };

    let outcome: CommandOutcome = execute_command(persistence, owner, catalog, command, today)?;

    Ok(WriteEntryResponse {
        entry_id: outcome.entry_id,
        message: format!(
            "Updated {}",
            catalog.display_name_or_raw(&outcome.entry_type)
        ),
        entry_type: outcome.entry_type,
    })
}

/// Deletes an entry.
///
/// # Errors
///
/// Returns an error if the source is read-only, the owner has no entry
/// with this id, or storage fails.
pub fn delete_entry(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    owner: &OwnerRef,
    catalog: &MilestoneCatalog,
    entry_id: i64,
    today: Date,
) -> Result<DeleteEntryResponse, ApiError> {
    source.ensure_writable()?;

    let command: Command = Command::DeleteEntry { entry_id };
    let entry_id: i64 = execute_command(persistence, owner, catalog, command, today)?.entry_id;

    Ok(DeleteEntryResponse {
        entry_id,
        message: format!("Deleted entry {entry_id}"),
    })
}

/// Computes statistics for the demo timeline alone.
fn demo_stats(catalog: &MilestoneCatalog, today: Date) -> CommunityStatsData {
    let submitted: Option<Date> = demo_milestone_dates()
        .find(|(entry_type, _)| *entry_type == SUBMISSION)
        .map(|(_, entry_date)| entry_date);

    let milestones: Vec<MilestoneStatsData> = submitted
        .map(|start| {
            demo_milestone_dates()
                .filter(|(entry_type, entry_date)| {
                    *entry_type != SUBMISSION
                        && catalog.lookup(entry_type).is_some()
                        && *entry_date <= today
                })
                .filter_map(|(entry_type, entry_date)| {
                    days_since(start, entry_date).map(|days| MilestoneStatsData {
                        entry_type: entry_type.to_string(),
                        owner_count: 1,
                        min_days: days,
                        avg_days: f64::from(i32::try_from(days).unwrap_or(i32::MAX)),
                        max_days: days,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    CommunityStatsData {
        tracked_owners: i64::from(submitted.is_some()),
        milestones,
    }
}

/// Returns community timing statistics, ordered by catalog position.
///
/// Types that are not in the catalog are listed last.
///
/// # Errors
///
/// Returns an error if the aggregate query fails.
pub fn get_community_stats(
    persistence: &mut SqlitePersistence,
    source: EntrySource,
    catalog: &MilestoneCatalog,
    today: Date,
) -> Result<CommunityStatsResponse, ApiError> {
    let stats: CommunityStatsData = match source {
        EntrySource::Database => persistence.community_stats()?,
        EntrySource::Demo => demo_stats(catalog, today),
    };

    let mut ordered: BTreeMap<(usize, String), MilestoneStatsInfo> = BTreeMap::new();
    for row in stats.milestones {
        let position: usize = catalog.position(&row.entry_type).unwrap_or(usize::MAX);
        ordered.insert(
            (position, row.entry_type.clone()),
            MilestoneStatsInfo {
                display_name: catalog.display_name_or_raw(&row.entry_type).to_string(),
                entry_type: row.entry_type,
                owner_count: row.owner_count,
                min_days: row.min_days,
                avg_days: row.avg_days,
                max_days: row.max_days,
            },
        );
    }

    Ok(CommunityStatsResponse {
        tracked_owners: stats.tracked_owners,
        milestones: ordered.into_values().collect(),
    })
}

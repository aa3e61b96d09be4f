// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timeline entry queries.
//!
//! Every query is scoped by owner. An id that belongs to a different owner
//! behaves exactly like an id that does not exist.

use diesel::SqliteConnection;
use diesel::prelude::*;
use prtrack_domain::{OwnerRef, TimelineEntry, parse_entry_date};
use tracing::{debug, warn};

use crate::diesel_schema::timeline_entries;
use crate::error::PersistenceError;

/// Diesel Queryable struct for timeline entry rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = timeline_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct EntryRow {
    entry_id: i64,
    owner_ref: String,
    entry_type: String,
    entry_date: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl EntryRow {
    fn into_entry(self) -> Result<TimelineEntry, PersistenceError> {
        let owner_ref: OwnerRef =
            OwnerRef::new(&self.owner_ref).map_err(|e| PersistenceError::InvalidStoredEntry {
                entry_id: self.entry_id,
                reason: e.to_string(),
            })?;
        let entry_date: time::Date = parse_entry_date(&self.entry_date).map_err(|e| {
            PersistenceError::InvalidStoredEntry {
                entry_id: self.entry_id,
                reason: e.to_string(),
            }
        })?;

        Ok(TimelineEntry {
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            ..TimelineEntry::with_id(
                self.entry_id,
                owner_ref,
                &self.entry_type,
                entry_date,
                self.notes,
            )
        })
    }
}

/// Lists all entries for an owner, oldest first.
///
/// Rows whose stored date cannot be parsed are skipped with a warning so a
/// single bad row never hides the rest of the timeline.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `owner` - The owning identity
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_entries(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
) -> Result<Vec<TimelineEntry>, PersistenceError> {
    debug!(owner = %owner, "Listing timeline entries");

    let rows: Vec<EntryRow> = timeline_entries::table
        .filter(timeline_entries::owner_ref.eq(owner.value()))
        .order((
            timeline_entries::entry_date.asc(),
            timeline_entries::entry_id.asc(),
        ))
        .select(EntryRow::as_select())
        .load(conn)?;

    let mut entries: Vec<TimelineEntry> = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_entry() {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(error = %e, "Skipping unreadable timeline entry"),
        }
    }

    debug!(owner = %owner, count = entries.len(), "Loaded timeline entries");
    Ok(entries)
}

/// Retrieves a single entry by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `owner` - The owning identity
/// * `entry_id` - The entry id
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
/// Returns `Ok(None)` if the owner has no entry with this id.
pub fn get_entry(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
    entry_id: i64,
) -> Result<Option<TimelineEntry>, PersistenceError> {
    debug!(owner = %owner, entry_id, "Looking up timeline entry");

    let row: Option<EntryRow> = timeline_entries::table
        .filter(timeline_entries::entry_id.eq(entry_id))
        .filter(timeline_entries::owner_ref.eq(owner.value()))
        .select(EntryRow::as_select())
        .first(conn)
        .optional()?;

    row.map(EntryRow::into_entry).transpose()
}

/// Looks up the id of an owner's entry for a milestone type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_entry_id_by_type(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
    entry_type: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(timeline_entries::table
        .filter(timeline_entries::owner_ref.eq(owner.value()))
        .filter(timeline_entries::entry_type.eq(entry_type))
        .select(timeline_entries::entry_id)
        .first::<i64>(conn)
        .optional()?)
}

/// Looks up the milestone type of an owner's entry without decoding the row.
///
/// Unlike `get_entry`, this also finds rows whose stored date cannot be
/// parsed, so callers can still update or remove them.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_entry_type(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
    entry_id: i64,
) -> Result<Option<String>, PersistenceError> {
    Ok(timeline_entries::table
        .filter(timeline_entries::entry_id.eq(entry_id))
        .filter(timeline_entries::owner_ref.eq(owner.value()))
        .select(timeline_entries::entry_type)
        .first::<String>(conn)
        .optional()?)
}

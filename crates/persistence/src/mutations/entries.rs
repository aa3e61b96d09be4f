// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timeline entry mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use prtrack::{Change, TransitionResult};
use prtrack_domain::{OwnerRef, TimelineEntry, format_entry_date};
use time::Date;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::timeline_entries;
use crate::error::PersistenceError;
use crate::queries::get_entry_id_by_type;

/// Inserts an entry, or replaces the owner's existing entry of the same type.
///
/// A replaced entry keeps its id and `created_at`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `owner` - The owning identity
/// * `entry_type` - The milestone identifier
/// * `entry_date` - The day the milestone occurred
/// * `notes` - Optional notes
///
/// # Returns
///
/// The id of the inserted or replaced entry.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_entry(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
    entry_type: &str,
    entry_date: Date,
    notes: Option<&str>,
) -> Result<i64, PersistenceError> {
    let date_text: String = format_entry_date(entry_date);

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        if let Some(entry_id) = get_entry_id_by_type(conn, owner, entry_type)? {
            diesel::update(timeline_entries::table)
                .filter(timeline_entries::entry_id.eq(entry_id))
                .set((
                    timeline_entries::entry_date.eq(&date_text),
                    timeline_entries::notes.eq(notes),
                    timeline_entries::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
                ))
                .execute(conn)?;

            info!(owner = %owner, entry_id, entry_type, "Replaced timeline entry");
            return Ok(entry_id);
        }

        diesel::insert_into(timeline_entries::table)
            .values((
                timeline_entries::owner_ref.eq(owner.value()),
                timeline_entries::entry_type.eq(entry_type),
                timeline_entries::entry_date.eq(&date_text),
                timeline_entries::notes.eq(notes),
            ))
            .execute(conn)?;

        let entry_id: i64 = conn.get_last_insert_rowid()?;
        info!(owner = %owner, entry_id, entry_type, "Inserted timeline entry");
        Ok(entry_id)
    })
}

/// Changes the date and notes of an owner's entry.
///
/// # Errors
///
/// Returns `PersistenceError::EntryNotFound` if the owner has no entry with
/// this id, or an error if the database write fails.
pub fn update_entry(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
    entry_id: i64,
    entry_date: Date,
    notes: Option<&str>,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(timeline_entries::table)
        .filter(timeline_entries::entry_id.eq(entry_id))
        .filter(timeline_entries::owner_ref.eq(owner.value()))
        .set((
            timeline_entries::entry_date.eq(format_entry_date(entry_date)),
            timeline_entries::notes.eq(notes),
            timeline_entries::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::EntryNotFound(entry_id));
    }

    info!(owner = %owner, entry_id, "Updated timeline entry");
    Ok(())
}

/// Deletes an owner's entry.
///
/// # Errors
///
/// Returns `PersistenceError::EntryNotFound` if the owner has no entry with
/// this id, or an error if the database write fails.
pub fn delete_entry(
    conn: &mut SqliteConnection,
    owner: &OwnerRef,
    entry_id: i64,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::delete(
        timeline_entries::table
            .filter(timeline_entries::entry_id.eq(entry_id))
            .filter(timeline_entries::owner_ref.eq(owner.value())),
    )
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::EntryNotFound(entry_id));
    }

    info!(owner = %owner, entry_id, "Deleted timeline entry");
    Ok(())
}

fn require_id(entry: &TimelineEntry) -> Result<i64, PersistenceError> {
    entry.entry_id.ok_or_else(|| {
        PersistenceError::Other(format!(
            "Timeline entry of type '{}' has no id",
            entry.entry_type
        ))
    })
}

/// Applies the change described by a transition to storage.
///
/// The owner is taken from the transition's timeline.
///
/// # Returns
///
/// The id of the affected entry.
///
/// # Errors
///
/// Returns an error if the write fails or an updated/deleted entry has no id.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    let owner: &OwnerRef = &result.new_timeline.owner_ref;
    debug!(owner = %owner, change = ?result.change, "Persisting timeline transition");

    match &result.change {
        Change::Inserted(entry) | Change::Replaced { current: entry, .. } => upsert_entry(
            conn,
            owner,
            &entry.entry_type,
            entry.entry_date,
            entry.notes.as_deref(),
        ),
        Change::Updated(entry) => {
            let entry_id: i64 = require_id(entry)?;
            update_entry(
                conn,
                owner,
                entry_id,
                entry.entry_date,
                entry.notes.as_deref(),
            )?;
            Ok(entry_id)
        }
        Change::Deleted(entry) => {
            let entry_id: i64 = require_id(entry)?;
            delete_entry(conn, owner, entry_id)?;
            Ok(entry_id)
        }
    }
}

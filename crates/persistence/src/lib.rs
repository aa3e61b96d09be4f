// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for prtrack.
//!
//! This crate stores timeline entries in `SQLite` through Diesel and
//! computes community statistics with a single aggregate query.
//!
//! ## Storage Rules
//!
//! - Each owner has at most one entry per milestone type, enforced by a
//!   `UNIQUE (owner_ref, entry_type)` constraint that is verified at startup
//! - Every read and write is scoped by owner; another owner's ids are
//!   reported as not found
//! - Dates are stored as ISO-8601 calendar dates (`YYYY-MM-DD`)
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory `SQLite` databases
//! - Migrations are embedded and applied on every connection

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use prtrack::{Timeline, TransitionResult};
use prtrack_domain::{OwnerRef, TimelineEntry};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{CommunityStatsData, MilestoneStatsData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias used by the API and server layers.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for timeline entries.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so instances
    /// never see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("prtrack_memdb_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_entry_uniqueness()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::sqlite::enable_wal_mode(&mut conn)?;

        conn.verify_entry_uniqueness()?;

        info!(path = %path_str, "Opened timeline database");
        Ok(Self { conn })
    }

    /// Records a milestone for an owner, replacing any existing entry of that type.
    ///
    /// # Returns
    ///
    /// The id of the inserted or replaced entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn upsert_entry(
        &mut self,
        owner: &OwnerRef,
        entry_type: &str,
        entry_date: Date,
        notes: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::upsert_entry(&mut self.conn, owner, entry_type, entry_date, notes)
    }

    /// Changes the date and notes of an owner's entry.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EntryNotFound` if the owner has no such entry.
    pub fn update_entry(
        &mut self,
        owner: &OwnerRef,
        entry_id: i64,
        entry_date: Date,
        notes: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::update_entry(&mut self.conn, owner, entry_id, entry_date, notes)
    }

    /// Deletes an owner's entry.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EntryNotFound` if the owner has no such entry.
    pub fn delete_entry(&mut self, owner: &OwnerRef, entry_id: i64) -> Result<(), PersistenceError> {
        mutations::delete_entry(&mut self.conn, owner, entry_id)
    }

    /// Retrieves one of an owner's entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if the owner
    /// has no entry with this id.
    pub fn get_entry(
        &mut self,
        owner: &OwnerRef,
        entry_id: i64,
    ) -> Result<Option<TimelineEntry>, PersistenceError> {
        queries::get_entry(&mut self.conn, owner, entry_id)
    }

    /// Returns the milestone type of an owner's entry, even if the row's
    /// stored date is unreadable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if the owner
    /// has no entry with this id.
    pub fn stored_entry_type(
        &mut self,
        owner: &OwnerRef,
        entry_id: i64,
    ) -> Result<Option<String>, PersistenceError> {
        queries::get_entry_type(&mut self.conn, owner, entry_id)
    }

    /// Lists all of an owner's entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_entries(&mut self, owner: &OwnerRef) -> Result<Vec<TimelineEntry>, PersistenceError> {
        queries::list_entries(&mut self.conn, owner)
    }

    /// Loads an owner's entries as a `Timeline` snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_timeline(&mut self, owner: &OwnerRef) -> Result<Timeline, PersistenceError> {
        let entries: Vec<TimelineEntry> = self.list_entries(owner)?;
        Ok(Timeline::with_entries(owner.clone(), entries))
    }

    /// Persists the change produced by a timeline transition.
    ///
    /// # Returns
    ///
    /// The id of the affected entry.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_transition(&mut self, result: &TransitionResult) -> Result<i64, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    /// Computes community timing statistics across all owners.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn community_stats(&mut self) -> Result<CommunityStatsData, PersistenceError> {
        queries::community_stats(&mut self.conn)
    }
}

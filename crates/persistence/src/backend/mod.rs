// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates backend-specific initialization, migration,
//! and helper functions that cannot be expressed in Diesel DSL.
//!
//! Backend-specific code is limited to:
//!
//! - Connection initialization
//! - Migration execution
//! - Backend-specific configuration (PRAGMA)
//! - Workarounds for missing Diesel DSL features
//!
//! Entry queries and mutations live in `queries/` and `mutations/`.

pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// Query and mutation functions call these helpers through the connection
/// so that the raw SQL stays in this module.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that the `(owner_ref, entry_type)` uniqueness constraint exists.
    ///
    /// Upserts depend on this constraint, so a schema without it is rejected
    /// at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the constraint is missing.
    fn verify_entry_uniqueness(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_entry_uniqueness(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_entry_uniqueness(self)
    }
}

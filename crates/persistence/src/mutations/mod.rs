// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL, with `last_insert_rowid()` reached through the
//! `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `entries` - Timeline entry writes and `persist_transition`

pub mod entries;

pub use entries::{delete_entry, persist_transition, update_entry, upsert_entry};

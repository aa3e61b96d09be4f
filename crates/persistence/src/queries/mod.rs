// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `entries` - Owner-scoped timeline entry queries
//! - `stats` - Community aggregate queries

pub mod entries;
pub mod stats;

pub use entries::{get_entry, get_entry_id_by_type, get_entry_type, list_entries};
pub use stats::community_stats;

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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;
mod source;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    delete_entry, fetch_entries, get_catalog, get_community_stats, get_owner_progress,
    get_progress, list_entries, record_milestone, update_entry,
};
pub use request_response::{
    CatalogResponse, CommunityStatsResponse, DeleteEntryResponse, EntryInfo, ListEntriesResponse,
    MilestoneInfo, MilestoneStatsInfo, ProgressResponse, RecordMilestoneRequest,
    UpdateEntryRequest, VisibleMilestoneInfo, WriteEntryResponse,
};
pub use source::{EntrySource, demo_entries};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates cross the boundary as `YYYY-MM-DD` strings.

use prtrack_domain::{MilestoneDefinition, MilestoneState};
use serde::{Deserialize, Serialize};

/// API request to record a milestone.
///
/// Recording a type that already has an entry replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMilestoneRequest {
    /// The milestone identifier.
    pub entry_type: String,
    /// The day the milestone occurred.
    pub entry_date: String,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to change an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    /// The new date.
    pub entry_date: String,
    /// The new notes. Omitting them clears them.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API response for a successful record or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteEntryResponse {
    /// The id of the written entry.
    pub entry_id: i64,
    /// The milestone identifier.
    pub entry_type: String,
    /// A success message.
    pub message: String,
}

/// API response for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    /// The id of the removed entry.
    pub entry_id: i64,
    /// A success message.
    pub message: String,
}

/// A stored timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Storage id. Demo entries have none.
    pub entry_id: Option<i64>,
    /// The raw milestone identifier.
    pub entry_type: String,
    /// Catalog display name, or the raw identifier for unknown types.
    pub display_name: String,
    /// The day the milestone occurred.
    pub entry_date: String,
    /// Whole days since `entry_date`. Absent when the date is in the future.
    pub days_ago: Option<i64>,
    /// Optional notes.
    pub notes: Option<String>,
    /// When storage first saw the entry.
    pub created_at: Option<String>,
    /// When storage last changed the entry.
    pub updated_at: Option<String>,
}

/// API response listing an owner's entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntriesResponse {
    /// The owner the entries belong to.
    pub owner_ref: String,
    /// The entries, oldest first.
    pub entries: Vec<EntryInfo>,
}

/// Catalog metadata for one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneInfo {
    pub id: String,
    pub display_name: String,
    pub icon_key: String,
    pub color_key: String,
    pub is_optional: bool,
    pub paired_with: Option<String>,
    /// Position in the full catalog.
    pub position: usize,
}

impl MilestoneInfo {
    /// Builds the DTO from a catalog definition and its position.
    #[must_use]
    pub fn from_definition(definition: &MilestoneDefinition, position: usize) -> Self {
        Self {
            id: definition.id().to_string(),
            display_name: definition.display_name().to_string(),
            icon_key: definition.icon_key().to_string(),
            color_key: definition.color_key().to_string(),
            is_optional: definition.is_optional(),
            paired_with: definition.pairing_predecessor().map(str::to_string),
            position,
        }
    }
}

/// API response describing the milestone catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    /// Every milestone in catalog order.
    pub milestones: Vec<MilestoneInfo>,
    /// Number of milestones, optional ones included.
    pub total_count: usize,
}

/// One milestone as shown on the progress timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleMilestoneInfo {
    #[serde(flatten)]
    pub milestone: MilestoneInfo,
    /// True when the milestone is at or before the furthest recorded one.
    pub is_completed: bool,
    /// True when the owner recorded this milestone.
    pub has_entry: bool,
    /// The recorded date, if any.
    pub entry_date: Option<String>,
    /// Presentation state.
    pub state: MilestoneState,
}

/// API response carrying an owner's derived progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Catalog index of the furthest recorded milestone, or -1.
    pub completed_index: i64,
    /// Fraction of the catalog passed, in `[0, 1]`.
    pub progress_fraction: f64,
    /// The first unrecorded, unlocked milestone after the furthest one.
    pub next_milestone: Option<MilestoneInfo>,
    /// Number of milestones in the catalog.
    pub total_count: usize,
    /// Milestones to display, in catalog order.
    pub milestones: Vec<VisibleMilestoneInfo>,
}

/// Community timing for one milestone type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneStatsInfo {
    pub entry_type: String,
    pub display_name: String,
    pub owner_count: i64,
    pub min_days: i64,
    pub avg_days: f64,
    pub max_days: i64,
}

/// API response carrying community timing statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStatsResponse {
    /// Owners that have recorded a submission.
    pub tracked_owners: i64,
    /// Per-milestone timing, in catalog order.
    pub milestones: Vec<MilestoneStatsInfo>,
}

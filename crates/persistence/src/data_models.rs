// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Aggregate timing for one milestone type across all owners.
///
/// Days are measured from each owner's own submission entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneStatsData {
    pub entry_type: String,
    pub owner_count: i64,
    pub min_days: i64,
    pub avg_days: f64,
    pub max_days: i64,
}

/// Community-wide timing statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStatsData {
    /// Owners that have recorded a submission.
    pub tracked_owners: i64,
    /// Per-type aggregates, ordered by entry type.
    pub milestones: Vec<MilestoneStatsData>,
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Community aggregate queries.
//!
//! Statistics are computed in a single aggregate statement so no owner's
//! individual entries leave the database.

use diesel::SqliteConnection;
use diesel::dsl::count;
use diesel::expression_methods::AggregateExpressionMethods;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Text};
use prtrack_domain::SUBMISSION;
use tracing::debug;

use crate::data_models::{CommunityStatsData, MilestoneStatsData};
use crate::diesel_schema::timeline_entries;
use crate::error::PersistenceError;

/// Days from each owner's submission to each of their other milestones.
///
/// Raw SQL because the statement needs an aliased self-join and
/// `julianday()`. Rows dated before submission, or with unparseable dates,
/// fall out of the `WHERE` clause.
const MILESTONE_STATS_SQL: &str = "
    SELECT e.entry_type AS entry_type,
           COUNT(DISTINCT e.owner_ref) AS owner_count,
           CAST(MIN(julianday(e.entry_date) - julianday(s.entry_date)) AS INTEGER) AS min_days,
           AVG(julianday(e.entry_date) - julianday(s.entry_date)) AS avg_days,
           CAST(MAX(julianday(e.entry_date) - julianday(s.entry_date)) AS INTEGER) AS max_days
    FROM timeline_entries e
    INNER JOIN timeline_entries s
        ON s.owner_ref = e.owner_ref AND s.entry_type = ?
    WHERE e.entry_type <> ?
      AND julianday(e.entry_date) >= julianday(s.entry_date)
    GROUP BY e.entry_type
    ORDER BY e.entry_type
";

#[derive(QueryableByName)]
struct MilestoneStatsRow {
    #[diesel(sql_type = Text)]
    entry_type: String,
    #[diesel(sql_type = BigInt)]
    owner_count: i64,
    #[diesel(sql_type = BigInt)]
    min_days: i64,
    #[diesel(sql_type = Double)]
    avg_days: f64,
    #[diesel(sql_type = BigInt)]
    max_days: i64,
}

/// Computes community timing statistics across all owners.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn community_stats(conn: &mut SqliteConnection) -> Result<CommunityStatsData, PersistenceError> {
    let tracked_owners: i64 = timeline_entries::table
        .filter(timeline_entries::entry_type.eq(SUBMISSION))
        .select(count(timeline_entries::owner_ref).aggregate_distinct())
        .first(conn)?;

    let rows: Vec<MilestoneStatsRow> = diesel::sql_query(MILESTONE_STATS_SQL)
        .bind::<Text, _>(SUBMISSION)
        .bind::<Text, _>(SUBMISSION)
        .load(conn)?;

    debug!(
        tracked_owners,
        milestone_types = rows.len(),
        "Computed community statistics"
    );

    Ok(CommunityStatsData {
        tracked_owners,
        milestones: rows
            .into_iter()
            .map(|row| MilestoneStatsData {
                entry_type: row.entry_type,
                owner_count: row.owner_count,
                min_days: row.min_days,
                avg_days: row.avg_days,
                max_days: row.max_days,
            })
            .collect(),
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use prtrack_domain::{MilestoneCatalog, MilestoneState, OwnerRef};
use serde_json::Value;

use crate::tests::helpers::create_test_owner;
use crate::{ProgressResponse, demo_entries, get_progress};

fn milestone_with_id<'a>(json: &'a Value, id: &str) -> &'a Value {
    json["milestones"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == id)
        .unwrap()
}

#[test]
fn test_empty_progress_serializes_not_started_index() {
    let response: ProgressResponse = get_progress(&[], MilestoneCatalog::canonical(), false);

    let json: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["completed_index"], -1);
    assert_eq!(json["progress_fraction"], 0.0);
    assert_eq!(json["total_count"], 13);
    assert_eq!(json["next_milestone"]["id"], "submission");
    assert_eq!(json["milestones"][0]["state"], "next");
    assert_eq!(json["milestones"][1]["state"], "upcoming");
}

#[test]
fn test_visible_milestones_flatten_catalog_fields() {
    let response: ProgressResponse = get_progress(&[], MilestoneCatalog::canonical(), false);

    let json: Value = serde_json::to_value(&response).unwrap();
    let first: &Value = &json["milestones"][0];

    assert_eq!(first["id"], "submission");
    assert_eq!(first["display_name"], "Submission");
    assert_eq!(first["position"], 0);
    assert_eq!(first["is_completed"], false);
    assert_eq!(first["has_entry"], false);
    assert!(first.get("milestone").is_none());
}

#[test]
fn test_milestone_states_serialize_in_snake_case() {
    let owner: OwnerRef = create_test_owner();
    let response: ProgressResponse =
        get_progress(&demo_entries(&owner), MilestoneCatalog::canonical(), false);

    let json: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(milestone_with_id(&json, "submission")["state"], "completed");
    assert_eq!(milestone_with_id(&json, "background_complete")["state"], "gap");
    assert_eq!(milestone_with_id(&json, "p2")["state"], "next");
    assert_eq!(milestone_with_id(&json, "ecopr")["state"], "upcoming");
    assert_eq!(milestone_with_id(&json, "p1")["entry_date"], "2025-06-02");
}

#[test]
fn test_milestone_state_round_trips_through_json() {
    assert_eq!(
        serde_json::to_string(&MilestoneState::Gap).unwrap(),
        "\"gap\""
    );
    let parsed: MilestoneState = serde_json::from_str("\"upcoming\"").unwrap();
    assert_eq!(parsed, MilestoneState::Upcoming);
}

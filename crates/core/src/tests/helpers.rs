// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Timeline;
use prtrack_domain::{OwnerRef, TimelineEntry};
use time::Date;
use time::macros::date;

pub fn create_test_owner() -> OwnerRef {
    OwnerRef::new("device-123").unwrap()
}

pub const fn test_today() -> Date {
    date!(2025 - 06 - 15)
}

/// A timeline with persisted submission and AOR entries.
pub fn create_test_timeline() -> Timeline {
    let owner: OwnerRef = create_test_owner();
    Timeline::with_entries(
        owner.clone(),
        vec![
            TimelineEntry::with_id(
                1,
                owner.clone(),
                "submission",
                date!(2025 - 01 - 02),
                None,
            ),
            TimelineEntry::with_id(
                2,
                owner,
                "aor",
                date!(2025 - 02 - 10),
                Some(String::from("AOR email")),
            ),
        ],
    )
}

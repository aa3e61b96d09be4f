// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use prtrack_domain::OwnerRef;
use time::Date;

pub fn create_test_owner() -> OwnerRef {
    OwnerRef::new("device-test").unwrap()
}

pub fn create_other_owner() -> OwnerRef {
    OwnerRef::new("device-other").unwrap()
}

/// Builds a date from year, month number and day.
pub fn ymd(year: i32, month: u8, day: u8) -> Date {
    Date::from_calendar_date(year, time::Month::try_from(month).expect("Valid month"), day)
        .expect("Valid test date")
}

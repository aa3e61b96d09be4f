// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar date helpers for timeline entries.
//!
//! Entry dates are calendar days with no time component, exchanged as
//! `YYYY-MM-DD` strings.

use crate::error::DomainError;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const ENTRY_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parses an entry date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_entry_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), ENTRY_DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats an entry date as `YYYY-MM-DD`.
///
/// Falls back to the `Display` form if formatting fails.
#[must_use]
pub fn format_entry_date(date: Date) -> String {
    date.format(ENTRY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Whole days elapsed from `date` to `today`.
///
/// Returns `None` when `date` is after `today`, so "days ago" displays can
/// show a placeholder instead of a negative count.
#[must_use]
pub fn days_since(date: Date, today: Date) -> Option<i64> {
    if date > today {
        return None;
    }
    Some((today - date).whole_days())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, MAX_NOTES_LEN, MilestoneCatalog, validate_entry_date, validate_entry_fields,
    validate_entry_type, validate_notes,
};
use time::macros::date;

#[test]
fn test_validate_entry_type_accepts_catalog_ids() {
    let catalog: &MilestoneCatalog = MilestoneCatalog::canonical();
    for milestone in catalog.all_milestones() {
        assert!(validate_entry_type(catalog, milestone.id()).is_ok());
    }
}

#[test]
fn test_validate_entry_type_rejects_unknown() {
    let result: Result<(), DomainError> =
        validate_entry_type(MilestoneCatalog::canonical(), "landing");
    assert_eq!(
        result,
        Err(DomainError::UnknownMilestone(String::from("landing")))
    );
}

#[test]
fn test_validate_entry_date_accepts_today_and_past() {
    let today = date!(2025 - 05 - 20);
    assert!(validate_entry_date(today, today).is_ok());
    assert!(validate_entry_date(date!(2024 - 12 - 31), today).is_ok());
}

#[test]
fn test_validate_entry_date_rejects_future() {
    let today = date!(2025 - 05 - 20);
    let result: Result<(), DomainError> = validate_entry_date(date!(2025 - 05 - 21), today);
    assert!(matches!(result, Err(DomainError::FutureEntryDate { .. })));
}

#[test]
fn test_validate_notes_limits() {
    assert!(validate_notes(None).is_ok());
    assert!(validate_notes(Some("")).is_ok());

    let at_limit: String = "é".repeat(MAX_NOTES_LEN);
    assert!(validate_notes(Some(&at_limit)).is_ok());

    let over: String = "a".repeat(MAX_NOTES_LEN + 1);
    assert_eq!(
        validate_notes(Some(&over)),
        Err(DomainError::NotesTooLong {
            length: MAX_NOTES_LEN + 1,
            max: MAX_NOTES_LEN,
        })
    );
}

#[test]
fn test_validate_entry_fields_checks_type_first() {
    let today = date!(2025 - 05 - 20);
    let result: Result<(), DomainError> = validate_entry_fields(
        MilestoneCatalog::canonical(),
        "landing",
        date!(2030 - 01 - 01),
        None,
        today,
    );
    assert!(matches!(result, Err(DomainError::UnknownMilestone(_))));
}

#[test]
fn test_validate_entry_fields_accepts_valid_entry() {
    let today = date!(2025 - 05 - 20);
    let result: Result<(), DomainError> = validate_entry_fields(
        MilestoneCatalog::canonical(),
        "biometrics_complete",
        date!(2025 - 05 - 01),
        Some("Done at the VAC"),
        today,
    );
    assert!(result.is_ok());
}

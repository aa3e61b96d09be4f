// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::catalog::MilestoneCatalog;
use crate::error::DomainError;
use time::Date;

/// Maximum length of entry notes, in characters.
pub const MAX_NOTES_LEN: usize = 2000;

/// Validates that an entry type names a catalog milestone.
///
/// This applies to writes only. The progress engine tolerates unknown
/// types in stored data.
///
/// # Errors
///
/// Returns `DomainError::UnknownMilestone` if the type is not in the catalog.
pub fn validate_entry_type(catalog: &MilestoneCatalog, entry_type: &str) -> Result<(), DomainError> {
    if catalog.lookup(entry_type).is_none() {
        return Err(DomainError::UnknownMilestone(entry_type.to_string()));
    }
    Ok(())
}

/// Validates that an entry date is not in the future.
///
/// # Arguments
///
/// * `entry_date` - The date the milestone occurred
/// * `today` - The day the entry is being submitted
///
/// # Errors
///
/// Returns `DomainError::FutureEntryDate` if `entry_date` is after `today`.
pub fn validate_entry_date(entry_date: Date, today: Date) -> Result<(), DomainError> {
    if entry_date > today {
        return Err(DomainError::FutureEntryDate { entry_date, today });
    }
    Ok(())
}

/// Validates the length of entry notes.
///
/// # Errors
///
/// Returns `DomainError::NotesTooLong` if the notes exceed `MAX_NOTES_LEN` characters.
pub fn validate_notes(notes: Option<&str>) -> Result<(), DomainError> {
    let length: usize = notes.map_or(0, |n| n.chars().count());
    if length > MAX_NOTES_LEN {
        return Err(DomainError::NotesTooLong {
            length,
            max: MAX_NOTES_LEN,
        });
    }
    Ok(())
}

/// Validates all write-side fields of an entry.
///
/// # Errors
///
/// Returns the first violated rule, checked in the order type, date, notes.
pub fn validate_entry_fields(
    catalog: &MilestoneCatalog,
    entry_type: &str,
    entry_date: Date,
    notes: Option<&str>,
    today: Date,
) -> Result<(), DomainError> {
    validate_entry_type(catalog, entry_type)?;
    validate_entry_date(entry_date, today)?;
    validate_notes(notes)
}

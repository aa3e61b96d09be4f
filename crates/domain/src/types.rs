// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;

/// Opaque reference to the identity that owns timeline entries.
///
/// This may be a device identifier or an account identifier; the
/// distinction belongs to identity provisioning, not to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    value: String,
}

impl OwnerRef {
    /// Maximum accepted length of an owner reference.
    pub const MAX_LEN: usize = 128;

    /// Creates a new `OwnerRef`.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or longer than `MAX_LEN`.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidOwnerRef(String::from(
                "Owner reference cannot be empty",
            )));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidOwnerRef(format!(
                "Owner reference must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the owner reference value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A user-recorded occurrence of a milestone.
///
/// `entry_type` is kept as the raw stored string. Values that are not in
/// the catalog survive a round-trip through storage and are ignored by the
/// progress engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Identifier assigned by storage. `None` until persisted.
    pub entry_id: Option<i64>,
    /// The owning identity.
    pub owner_ref: OwnerRef,
    /// The milestone identifier this entry records.
    pub entry_type: String,
    /// Calendar day the milestone occurred.
    pub entry_date: Date,
    /// Free-form notes with no meaning to the engine.
    pub notes: Option<String>,
    /// Set by storage on creation.
    pub created_at: Option<String>,
    /// Set by storage on every change.
    pub updated_at: Option<String>,
}

impl TimelineEntry {
    /// Creates a new, unpersisted entry.
    #[must_use]
    pub fn new(
        owner_ref: OwnerRef,
        entry_type: &str,
        entry_date: Date,
        notes: Option<String>,
    ) -> Self {
        Self {
            entry_id: None,
            owner_ref,
            entry_type: entry_type.to_string(),
            entry_date,
            notes,
            created_at: None,
            updated_at: None,
        }
    }

    /// Creates an entry with a storage-assigned identifier.
    #[must_use]
    pub fn with_id(
        entry_id: i64,
        owner_ref: OwnerRef,
        entry_type: &str,
        entry_date: Date,
        notes: Option<String>,
    ) -> Self {
        Self {
            entry_id: Some(entry_id),
            ..Self::new(owner_ref, entry_type, entry_date, notes)
        }
    }
}

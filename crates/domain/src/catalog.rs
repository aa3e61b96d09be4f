// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The milestone catalog.
//!
//! A catalog is the single ordered table of milestones in the permanent
//! residency journey, together with their display metadata and two-stage
//! pairing rules. Every consumer (progress computation, validation, API
//! responses) reads milestone metadata from here instead of matching on
//! identifiers.
//!
//! The canonical catalog is static and never altered after startup.

use crate::error::DomainError;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Identifier of the submission milestone.
pub const SUBMISSION: &str = "submission";

/// A single milestone in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MilestoneDefinition {
    /// Stable identifier stored in timeline entries.
    id: &'static str,
    /// Human-readable label.
    display_name: &'static str,
    /// Icon lookup key for presentation.
    icon_key: &'static str,
    /// Color lookup key for presentation.
    color_key: &'static str,
    /// Optional milestones appear only once an entry for them exists.
    is_optional: bool,
    /// The request-stage milestone this completion-stage milestone depends on.
    paired_with: Option<&'static str>,
}

impl MilestoneDefinition {
    /// Creates a required, unpaired milestone definition.
    #[must_use]
    pub const fn new(
        id: &'static str,
        display_name: &'static str,
        icon_key: &'static str,
        color_key: &'static str,
    ) -> Self {
        Self {
            id,
            display_name,
            icon_key,
            color_key,
            is_optional: false,
            paired_with: None,
        }
    }

    /// Marks this milestone as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Pairs this completion-stage milestone with its request-stage predecessor.
    #[must_use]
    pub const fn paired_with(mut self, predecessor: &'static str) -> Self {
        self.paired_with = Some(predecessor);
        self
    }

    /// Returns the milestone identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Returns the icon key.
    #[must_use]
    pub const fn icon_key(&self) -> &'static str {
        self.icon_key
    }

    /// Returns the color key.
    #[must_use]
    pub const fn color_key(&self) -> &'static str {
        self.color_key
    }

    /// Returns whether the milestone is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// Returns the paired request-stage identifier, if any.
    #[must_use]
    pub const fn pairing_predecessor(&self) -> Option<&'static str> {
        self.paired_with
    }
}

/// The canonical 13-milestone journey.
///
/// Older 4, 10 and 12 stage variants are not supported.
pub const CANONICAL_MILESTONES: [MilestoneDefinition; 13] = [
    MilestoneDefinition::new(SUBMISSION, "Submission", "send", "blue"),
    MilestoneDefinition::new("aor", "Acknowledgement of Receipt", "mail-open", "indigo"),
    MilestoneDefinition::new(
        "biometrics_request",
        "Biometrics Requested",
        "fingerprint",
        "purple",
    ),
    MilestoneDefinition::new(
        "biometrics_complete",
        "Biometrics Completed",
        "fingerprint-check",
        "purple",
    )
    .paired_with("biometrics_request"),
    MilestoneDefinition::new("medicals_request", "Medicals Requested", "stethoscope", "pink"),
    MilestoneDefinition::new(
        "medicals_complete",
        "Medicals Completed",
        "heart-pulse",
        "pink",
    )
    .paired_with("medicals_request"),
    MilestoneDefinition::new(
        "background_start",
        "Background Check Started",
        "search",
        "orange",
    ),
    MilestoneDefinition::new(
        "background_complete",
        "Background Check Completed",
        "shield-check",
        "orange",
    )
    .paired_with("background_start"),
    MilestoneDefinition::new(
        "additional_docs",
        "Additional Documents Requested",
        "file-plus",
        "amber",
    )
    .optional(),
    MilestoneDefinition::new("p1", "Portal 1", "door-open", "teal"),
    MilestoneDefinition::new("p2", "Portal 2", "upload", "cyan"),
    MilestoneDefinition::new("ecopr", "eCoPR", "badge-check", "green"),
    MilestoneDefinition::new("pr_card", "PR Card Received", "id-card", "emerald"),
];

static CANONICAL: LazyLock<MilestoneCatalog> = LazyLock::new(|| MilestoneCatalog {
    milestones: CANONICAL_MILESTONES.to_vec(),
});

/// An immutable, ordered milestone catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneCatalog {
    milestones: Vec<MilestoneDefinition>,
}

impl MilestoneCatalog {
    /// Builds a catalog from an ordered list of definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The list is empty
    /// - An identifier appears more than once
    /// - A pairing references an identifier that is not earlier in the order
    pub fn new(milestones: Vec<MilestoneDefinition>) -> Result<Self, DomainError> {
        if milestones.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }

        let mut seen: HashSet<&'static str> = HashSet::new();
        for milestone in &milestones {
            if let Some(predecessor) = milestone.paired_with {
                if !seen.contains(predecessor) {
                    return Err(DomainError::InvalidPairing {
                        milestone: milestone.id.to_string(),
                        predecessor: predecessor.to_string(),
                    });
                }
            }
            if !seen.insert(milestone.id) {
                return Err(DomainError::DuplicateMilestone(milestone.id.to_string()));
            }
        }

        Ok(Self { milestones })
    }

    /// Returns the process-wide canonical catalog.
    #[must_use]
    pub fn canonical() -> &'static Self {
        &CANONICAL
    }

    /// Returns every milestone in catalog order.
    #[must_use]
    pub fn all_milestones(&self) -> &[MilestoneDefinition] {
        &self.milestones
    }

    /// Looks up a milestone by identifier.
    ///
    /// Unknown identifiers yield `None`; they are never an error.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&MilestoneDefinition> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Returns the catalog position of an identifier.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.milestones.iter().position(|m| m.id == id)
    }

    /// Returns the request-stage identifier for a completion-stage identifier.
    #[must_use]
    pub fn pairing_predecessor(&self, id: &str) -> Option<&'static str> {
        self.lookup(id).and_then(MilestoneDefinition::pairing_predecessor)
    }

    /// Returns the display name for a known identifier, or the raw identifier.
    #[must_use]
    pub fn display_name_or_raw<'a>(&self, id: &'a str) -> &'a str {
        self.lookup(id).map_or(id, |m| m.display_name)
    }

    /// Returns the number of milestones, optional ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    /// Returns true if the catalog has no milestones.
    ///
    /// Catalogs built through `new` are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }
}

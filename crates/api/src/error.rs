// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use prtrack::CoreError;
use prtrack_domain::DomainError;
use prtrack_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller's owner identity is missing or invalid.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A write was attempted against a read-only entry source.
    ReadOnlySource {
        /// The source that rejected the write.
        source_name: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::ReadOnlySource { source_name } => {
                write!(f, "The {source_name} entry source is read-only")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::EmptyCatalog
        | DomainError::DuplicateMilestone(_)
        | DomainError::InvalidPairing { .. } => ApiError::Internal {
            message: format!("Milestone catalog is misconfigured: {err}"),
        },
        DomainError::UnknownMilestone(id) => ApiError::InvalidInput {
            field: String::from("entry_type"),
            message: format!("'{id}' is not a known milestone"),
        },
        DomainError::FutureEntryDate { entry_date, today } => ApiError::DomainRuleViolation {
            rule: String::from("entry_date_not_future"),
            message: format!("Entry date {entry_date} is after today ({today})"),
        },
        DomainError::NotesTooLong { length, max } => ApiError::InvalidInput {
            field: String::from("notes"),
            message: format!("Notes are {length} characters long; the limit is {max}"),
        },
        DomainError::InvalidOwnerRef(reason) => ApiError::AuthenticationFailed { reason },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("entry_date"),
            message: format!("'{date_string}' is not a YYYY-MM-DD date: {error}"),
        },
        DomainError::EntryNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Timeline entry"),
            message: format!("Entry {id} does not exist"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::EntryNotFound(id) => Self::ResourceNotFound {
                resource_type: String::from("Timeline entry"),
                message: format!("Entry {id} does not exist"),
            },
            _ => Self::Internal {
                message: format!("Storage failure: {err}"),
            },
        }
    }
}

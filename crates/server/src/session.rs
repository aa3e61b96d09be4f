// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Owner extraction for the server.
//!
//! Identity provisioning (device ids, accounts) happens outside this
//! service. Callers present the resulting opaque owner reference in the
//! `X-Owner-Ref` header and every entry operation is scoped to it.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use prtrack_domain::OwnerRef;
use tracing::{debug, warn};

/// Header carrying the caller's owner reference.
pub const OWNER_HEADER: &str = "X-Owner-Ref";

/// Extractor for the requesting owner.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(Owner(owner): Owner) -> Result<Json<Response>, HttpError> {
///     // owner: OwnerRef
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if the header is missing, is not valid
/// UTF-8, or does not hold a valid owner reference.
pub struct Owner(pub OwnerRef);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = OwnerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(OWNER_HEADER)
            .ok_or_else(|| {
                debug!("Missing owner header");
                OwnerError::MissingOwnerHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid owner header encoding");
                OwnerError::InvalidOwnerHeader(String::from("header is not valid UTF-8"))
            })?;

        let owner: OwnerRef = OwnerRef::new(raw).map_err(|e| {
            warn!(error = %e, "Rejected owner reference");
            OwnerError::InvalidOwnerHeader(e.to_string())
        })?;

        Ok(Self(owner))
    }
}

/// Owner extraction errors.
///
/// These errors are automatically converted to HTTP responses.
#[derive(Debug)]
pub enum OwnerError {
    /// The owner header is missing.
    MissingOwnerHeader,
    /// The owner header is present but unusable.
    InvalidOwnerHeader(String),
}

impl IntoResponse for OwnerError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingOwnerHeader => format!("Missing {OWNER_HEADER} header"),
            Self::InvalidOwnerHeader(reason) => format!("Invalid {OWNER_HEADER} header: {reason}"),
        };

        crate::HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}

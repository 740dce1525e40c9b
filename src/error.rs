//! Service error types with HTTP status code mapping.
//!
//! [`MatchError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DogId, MatchId, MatchStatus};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4002,
///     "message": "invalid transition from declined to accepted",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`MatchError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status               |
/// |-----------|---------------------|---------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request           |
/// | 2000–2999 | Not Found           | 404 Not Found             |
/// | 3000–3999 | Server / Store      | 500 Internal Server Error |
/// | 4000–4999 | Authorization/State | 403 Forbidden / 409 Conflict |
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Request validation failed before any state was touched.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Target status string is not one of the seven enumerated values.
    #[error("unsupported match status: {0}")]
    InvalidStatus(String),

    /// Outcome string is not one of `success`, `failed`, `no_show`.
    #[error("unsupported outcome: {0}")]
    InvalidOutcome(String),

    /// Dog with the given ID was not found or is not visible to the actor.
    #[error("dog not found: {0}")]
    DogNotFound(DogId),

    /// Match with the given ID was not found or is not visible to the actor.
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    /// Actor is not permitted to perform this transition.
    #[error("not allowed: {0}")]
    Authorization(String),

    /// The current status does not permit the attempted transition.
    #[error("invalid transition from {from} to {to}")]
    StateConflict {
        /// Status the match is currently in.
        from: MatchStatus,
        /// Status the transition targeted.
        to: MatchStatus,
    },

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Store(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MatchError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidStatus(_) => 1002,
            Self::InvalidOutcome(_) => 1003,
            Self::DogNotFound(_) => 2001,
            Self::MatchNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Store(_) => 3001,
            Self::Authorization(_) => 4001,
            Self::StateConflict { .. } => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidStatus(_) | Self::InvalidOutcome(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DogNotFound(_) | Self::MatchNotFound(_) => StatusCode::NOT_FOUND,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::StateConflict { .. } => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::MatchStatus;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = MatchError::Validation("missing match id".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = MatchError::MatchNotFound(MatchId::new());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2002);
    }

    #[test]
    fn authorization_maps_to_forbidden() {
        let err = MatchError::Authorization("only the requested party may accept".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), 4001);
    }

    #[test]
    fn state_conflict_maps_to_conflict() {
        let err = MatchError::StateConflict {
            from: MatchStatus::Declined,
            to: MatchStatus::Accepted,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "invalid transition from declined to accepted");
    }

    #[test]
    fn store_maps_to_internal() {
        let err = MatchError::Store("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }
}

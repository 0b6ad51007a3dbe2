/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the wire format.
///
/// # Wire format
///
/// Business failures of every kind surface as `400 Bad Request` carrying a
/// `{"message": "..."}` body; the message text is the contract clients key
/// on. A missing resource on a direct `GET /{id}` lookup is the one
/// exception: it answers `404 Not Found` with an empty body. Database
/// failures answer `500` with a generic message and the detail goes to the
/// log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use stockroom_shared::error::ServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) with a message envelope; all business failures
    /// surface here
    BadRequest(String),

    /// Not found (404) with an empty body, for direct lookups of missing
    /// resources
    NotFound,

    /// Internal server error (500); the detail is logged, not exposed
    Internal(String),
}

/// Error response format: a bare message envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { message }),
            )
                .into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(detail) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        message: "An internal error occurred".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Convert service errors to API errors
///
/// Every business failure keeps its message and lands on 400; only database
/// failures are internal.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => ApiError::Internal(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// Convert raw sqlx errors to API errors
///
/// Handlers that call models directly (catalogue, suppliers) route their
/// database errors through the service taxonomy first, so constraint
/// violations keep their friendly messages.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from(ServiceError::from(err))
    }
}

/// Flattens validator output into the message envelope
///
/// Only the first failure is reported, matching the single-message wire
/// contract.
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|err| err.message.as_ref())
        .map(|m| m.to_string())
        .next()
        .unwrap_or_else(|| "Validation failed".to_string());

    ApiError::BadRequest(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");
    }

    #[test]
    fn test_business_failures_map_to_bad_request() {
        let cases = [
            ServiceError::NotFound("Task not found".to_string()),
            ServiceError::Forbidden("You don't have permission to update this task".to_string()),
            ServiceError::Conflict("Username already exists".to_string()),
            ServiceError::Validation("Password is required".to_string()),
            ServiceError::AuthFailure("Invalid credentials".to_string()),
        ];

        for err in cases {
            let message = err.to_string();
            match ApiError::from(err) {
                ApiError::BadRequest(m) => assert_eq!(m, message),
                other => panic!("expected BadRequest, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_database_errors_are_internal() {
        let err = ServiceError::Database(sqlx::Error::PoolTimedOut);
        assert!(matches!(ApiError::from(err), ApiError::Internal(_)));
    }
}

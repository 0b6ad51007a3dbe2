/// Service-level error taxonomy
///
/// Every service operation returns `Result<T, ServiceError>`. The variants
/// keep the failure kinds distinct (missing entity, policy rejection,
/// uniqueness conflict, malformed input, bad credentials) even though the
/// HTTP adapter collapses most of them to a single status code for wire
/// compatibility.
///
/// # Example
///
/// ```
/// use stockroom_shared::error::ServiceError;
///
/// let err = ServiceError::NotFound("Task not found".to_string());
/// assert_eq!(err.to_string(), "Task not found");
/// ```

use thiserror::Error;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unified service error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced user, task, product, or supplier does not exist
    #[error("{0}")]
    NotFound(String),

    /// The authorization policy rejected the actor
    #[error("{0}")]
    Forbidden(String),

    /// Username/email uniqueness violation, or role mismatch at login
    #[error("{0}")]
    Conflict(String),

    /// Malformed role string or missing required field
    #[error("{0}")]
    Validation(String),

    /// Bad credentials at login
    #[error("{0}")]
    AuthFailure(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Convert sqlx errors to service errors
///
/// Unique-constraint violations on the users table are surfaced as `Conflict`
/// with the same message text as the pre-insert existence checks, so the
/// constraint-backed path and the check-then-act path are indistinguishable
/// on the wire.
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("username") {
                    return ServiceError::Conflict("Username already exists".to_string());
                }
                if constraint.contains("email") {
                    return ServiceError::Conflict("Email already exists".to_string());
                }
                if constraint.starts_with("tasks_") {
                    return ServiceError::Conflict(
                        "User is referenced by existing tasks".to_string(),
                    );
                }
            }
        }

        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_bare_message() {
        let err = ServiceError::Forbidden("Only managers and admins can create tasks".to_string());
        assert_eq!(err.to_string(), "Only managers and admins can create tasks");

        let err = ServiceError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn test_row_not_found_maps_to_database() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Database(_)));
    }
}

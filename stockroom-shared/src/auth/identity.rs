/// Identity resolution
///
/// Every task operation loads its actor (and, for creation, the assignee) by
/// username before any policy check runs. The actor username comes straight
/// from a query parameter; there is no session to consult.

use crate::error::{ServiceError, ServiceResult};
use crate::models::user::User;
use sqlx::PgPool;

/// Resolves a username to a user row
///
/// # Errors
///
/// Fails with `NotFound("User not found")` if no such user exists.
pub async fn resolve(pool: &PgPool, username: &str) -> ServiceResult<User> {
    resolve_or(pool, username, "User not found").await
}

/// Resolves a username to a user row with a call-site-specific missing message
///
/// The task creation path distinguishes a missing creator from a missing
/// assignee in its error text.
pub async fn resolve_or(pool: &PgPool, username: &str, message: &str) -> ServiceResult<User> {
    User::find_by_username(pool, username)
        .await?
        .ok_or_else(|| ServiceError::NotFound(message.to_string()))
}

/// Account service: login, registration, and user administration
///
/// Passwords are compared as opaque strings; hashing is out of scope for
/// this service. Uniqueness is checked up front for friendlier messages,
/// with the unique constraints (and the error translation in
/// [`crate::error::ServiceError`]) as the backstop under races.

use crate::auth::token;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::Task;
use crate::models::user::{CreateUser, Role, UpdateUser, User, UserResponse};
use serde::Serialize;
use sqlx::PgPool;

/// A successful login or registration: the opaque token plus the account
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserResponse,
}

/// Input for registering or creating an account
///
/// The role arrives as the raw client string and is parsed (and uppercased)
/// here, so `"staff"` and `"STAFF"` both work.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Input for updating an account
///
/// An absent or empty password keeps the stored one.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub username: String,
    pub email: String,
    pub role: String,
    pub password: Option<String>,
}

fn role_mismatch_message(user: &User, requested: &str) -> String {
    format!(
        "Invalid role. User '{}' has role '{}', not '{}'",
        user.username, user.role, requested
    )
}

fn require_password(password: &str) -> ServiceResult<()> {
    if password.trim().is_empty() {
        return Err(ServiceError::Validation("Password is required".to_string()));
    }

    Ok(())
}

/// Authenticates a login string (username or email) against a password and
/// an expected role
///
/// # Errors
///
/// - `AuthFailure("Invalid credentials")` when the account doesn't exist or
///   the password doesn't match; the two cases are indistinguishable on the
///   wire
/// - `Conflict` when the account exists but holds a different role than the
///   client asked for; the message names both roles
pub async fn login(
    pool: &PgPool,
    login: &str,
    password: &str,
    role: &str,
) -> ServiceResult<AuthSession> {
    let user = User::find_by_username_or_email(pool, login, login)
        .await?
        .ok_or_else(|| ServiceError::AuthFailure("Invalid credentials".to_string()))?;

    if user.password != password {
        return Err(ServiceError::AuthFailure("Invalid credentials".to_string()));
    }

    // Exact comparison against the stored role name; the client is expected
    // to send the uppercase form.
    if user.role.as_str() != role {
        return Err(ServiceError::Conflict(role_mismatch_message(&user, role)));
    }

    tracing::info!(username = %user.username, role = %user.role, "User logged in");

    Ok(AuthSession {
        token: token::issue(user.id),
        user: user.into(),
    })
}

/// Registers a new account and logs it in
///
/// # Errors
///
/// - `Validation("Password is required")` on an empty password
/// - `Conflict("Username already exists")` / `Conflict("Email already exists")`
/// - `Validation("Invalid role: ...")` on an unknown role string
pub async fn register(pool: &PgPool, account: NewAccount) -> ServiceResult<AuthSession> {
    let user = insert_account(pool, account).await?;

    tracing::info!(username = %user.username, role = %user.role, "User registered");

    Ok(AuthSession {
        token: token::issue(user.id),
        user: user.into(),
    })
}

/// Creates an account through the admin surface
///
/// Same checks as [`register`], but no session is issued.
pub async fn create_user(pool: &PgPool, account: NewAccount) -> ServiceResult<UserResponse> {
    let user = insert_account(pool, account).await?;

    tracing::info!(username = %user.username, role = %user.role, "User created");

    Ok(user.into())
}

async fn insert_account(pool: &PgPool, account: NewAccount) -> ServiceResult<User> {
    require_password(&account.password)?;

    if User::exists_by_username(pool, &account.username).await? {
        return Err(ServiceError::Conflict("Username already exists".to_string()));
    }

    if User::exists_by_email(pool, &account.email).await? {
        return Err(ServiceError::Conflict("Email already exists".to_string()));
    }

    let role: Role = account.role.parse()?;

    let user = User::create(
        pool,
        CreateUser {
            username: account.username,
            email: account.email,
            password: account.password,
            role,
        },
    )
    .await?;

    Ok(user)
}

/// Looks up the account behind a username, for the current-user endpoint
///
/// # Errors
///
/// Fails with `NotFound("User not found: {username}")` when no such account
/// exists.
pub async fn current_user(pool: &PgPool, username: &str) -> ServiceResult<UserResponse> {
    let user = User::find_by_username(pool, username)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User not found: {}", username)))?;

    Ok(user.into())
}

/// Lists all accounts
pub async fn get_all_users(pool: &PgPool) -> ServiceResult<Vec<UserResponse>> {
    let users = User::list(pool).await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

/// Updates an account
///
/// Uniqueness is only re-checked for fields that actually change, so a
/// no-op update of an existing account never conflicts with itself. Role
/// changes are permitted; existing tasks keep their creator/assignee rows
/// and are unaffected.
pub async fn update_user(
    pool: &PgPool,
    id: i64,
    update: AccountUpdate,
) -> ServiceResult<UserResponse> {
    let user = User::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    if update.username != user.username && User::exists_by_username(pool, &update.username).await? {
        return Err(ServiceError::Conflict("Username already exists".to_string()));
    }

    if update.email != user.email && User::exists_by_email(pool, &update.email).await? {
        return Err(ServiceError::Conflict("Email already exists".to_string()));
    }

    let role: Role = update.role.parse()?;
    let password = update.password.filter(|p| !p.trim().is_empty());

    let updated = User::update(
        pool,
        id,
        UpdateUser {
            username: update.username,
            email: update.email,
            role,
            password,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = id, username = %updated.username, "User updated");

    Ok(updated.into())
}

/// Deletes an account
///
/// # Errors
///
/// - `NotFound("User not found")` when the account doesn't exist
/// - `Conflict("User is referenced by existing tasks")` when any task still
///   points at the account as creator or assignee; the `ON DELETE RESTRICT`
///   foreign keys enforce the same rule at the database level
pub async fn delete_user(pool: &PgPool, id: i64) -> ServiceResult<()> {
    if !User::exists_by_id(pool, id).await? {
        return Err(ServiceError::NotFound("User not found".to_string()));
    }

    if Task::exists_for_user(pool, id).await? {
        return Err(ServiceError::Conflict(
            "User is referenced by existing tasks".to_string(),
        ));
    }

    User::delete(pool, id).await?;

    tracing::info!(user_id = id, "User deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mismatch_message_names_both_roles() {
        let user = User {
            id: 1,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "password123".to_string(),
            role: Role::Manager,
        };

        assert_eq!(
            role_mismatch_message(&user, "ADMIN"),
            "Invalid role. User 'admin' has role 'MANAGER', not 'ADMIN'"
        );
    }

    #[test]
    fn test_require_password_rejects_blank() {
        assert!(require_password("password123").is_ok());

        let err = require_password("   ").unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }

    #[test]
    fn test_auth_session_serializes_token_and_user() {
        let session = AuthSession {
            token: token::issue(3),
            user: UserResponse {
                id: 3,
                username: "staff1".to_string(),
                email: "staff@example.com".to_string(),
                role: Role::Staff,
            },
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["token"], "mock-token-3");
        assert_eq!(json["user"]["username"], "staff1");
        assert!(json["user"].get("password").is_none());
    }
}

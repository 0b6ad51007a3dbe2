/// User model and database operations
///
/// This module provides the User model and the queries behind identity
/// resolution, registration, and the user admin surface.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password VARCHAR(255) NOT NULL,
///     role VARCHAR(20) NOT NULL
/// );
/// ```
///
/// Passwords are stored as opaque strings. Hashing them is an explicit
/// non-goal of this service; the column is never serialized to the wire
/// (see [`UserResponse`]).
///
/// # Example
///
/// ```no_run
/// use stockroom_shared::models::user::{CreateUser, Role, User};
/// use stockroom_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "staff1".to_string(),
///     email: "staff@example.com".to_string(),
///     password: "password123".to_string(),
///     role: Role::Staff,
/// }).await?;
///
/// let found = User::find_by_username(&pool, "staff1").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use std::fmt;
use std::str::FromStr;

/// User role
///
/// Stored and serialized as the uppercase name ("ADMIN", "MANAGER", "STAFF").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access, including user administration and any task operation
    Admin,

    /// May create tasks and manage the catalogue
    Manager,

    /// May be assigned tasks; may update tasks assigned to them
    Staff,
}

impl Role {
    /// Converts the role to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse, matching the explicit uppercasing the register
/// and update paths perform on client-supplied role strings.
impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "STAFF" => Ok(Role::Staff),
            other => Err(ServiceError::Validation(format!("Invalid role: {}", other))),
        }
    }
}

/// User model representing an account row
///
/// Deliberately not `Serialize`: the password column must never reach the
/// wire. Convert to [`UserResponse`] before returning a user to a client.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Unique username (case-sensitive as stored)
    pub username: String,

    /// Unique email address (case-sensitive as stored)
    pub email: String,

    /// Opaque password string
    pub password: String,

    /// Role driving the authorization policy
    pub role: Role,
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role.parse().map_err(|_| sqlx::Error::ColumnDecode {
            index: "role".into(),
            source: format!("unknown role: {}", role).into(),
        })?;

        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            role,
        })
    }
}

/// Wire representation of a user: the account minus its password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user ID
    pub id: i64,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Role name ("ADMIN", "MANAGER", "STAFF")
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// Email address (must be unique)
    pub email: String,

    /// Opaque password string
    pub password: String,

    /// Role
    pub role: Role,
}

/// Input for updating an existing user
///
/// Username, email, and role are always written; the password is left
/// unchanged when `None`.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    /// New username
    pub username: String,

    /// New email address
    pub email: String,

    /// New role
    pub role: Role,

    /// New password, or `None` to keep the current one
    pub password: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password, role
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password)
        .bind(data.role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact, case-sensitive)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user matching either a username or an email address
    ///
    /// The login path passes the same login string for both parameters.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role FROM users WHERE username = $1 OR email = $2",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a user with the given ID exists
    pub async fn exists_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Checks whether a username is already taken
    pub async fn exists_by_username(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Checks whether an email address is already taken
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists all users with a given role
    pub async fn find_by_role(pool: &PgPool, role: Role) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role FROM users WHERE role = $1 ORDER BY id",
        )
        .bind(role.as_str())
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists all users
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, role FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates an existing user
    ///
    /// Username, email, and role are replaced; the password is only written
    /// when `data.password` is `Some`.
    ///
    /// # Returns
    ///
    /// The updated user if found, `None` if the user doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                email = $3,
                role = $4,
                password = COALESCE($5, password)
            WHERE id = $1
            RETURNING id, username, email, password, role
            "#,
        )
        .bind(id)
        .bind(data.username)
        .bind(data.email)
        .bind(data.role.as_str())
        .bind(data.password)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Fails with a foreign-key violation if the user is still referenced by
    /// tasks; the caller checks for references first.
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if the user didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::Manager.as_str(), "MANAGER");
        assert_eq!(Role::Staff.as_str(), "STAFF");
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        let err = "SUPERVISOR".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid role: SUPERVISOR");
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"STAFF\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"MANAGER\"").unwrap(),
            Role::Manager
        );
    }

    #[test]
    fn test_user_response_drops_password() {
        let user = User {
            id: 7,
            username: "staff1".to_string(),
            email: "staff@example.com".to_string(),
            password: "password123".to_string(),
            role: Role::Staff,
        };

        let response = UserResponse::from(&user);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "staff1");
        assert_eq!(json["role"], "STAFF");
        assert!(json.get("password").is_none());
    }
}

/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new account and get a token
/// - `POST /api/auth/login` - Login against username-or-email + password + role
/// - `GET /api/auth/me?username=` - Look up the current account
///
/// The token returned here is opaque and never checked again; subsequent
/// requests carry the actor in query parameters instead.

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use stockroom_shared::models::user::UserResponse;
use stockroom_shared::service::accounts::{self, AuthSession, NewAccount};
use validator::Validate;

use super::ActorQuery;

/// Login request
///
/// The `username` field also accepts an email address. The role is the
/// client's claim about which console it is logging into; a mismatch with
/// the stored role fails the login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    pub password: String,

    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

/// Register request, shared with the user admin surface
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Absent or empty means "not provided"; the register path rejects it,
    /// the update path keeps the stored password
    pub password: Option<String>,

    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

/// Login handler
///
/// # Errors
///
/// `400` with `Invalid credentials` for a bad username or password, or with
/// a role-mismatch message naming both roles.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthSession>> {
    req.validate().map_err(validation_error)?;

    let session = accounts::login(&state.db, &req.username, &req.password, &req.role).await?;

    Ok(Json(session))
}

/// Register handler
///
/// Creates the account and immediately issues a session, so the client can
/// follow up with `GET /api/auth/me` without logging in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthSession>> {
    req.validate().map_err(validation_error)?;

    let session = accounts::register(
        &state.db,
        NewAccount {
            username: req.username,
            email: req.email,
            password: req.password.unwrap_or_default(),
            role: req.role,
        },
    )
    .await?;

    Ok(Json(session))
}

/// Current-user handler
pub async fn current_user(
    State(state): State<AppState>,
    Query(actor): Query<ActorQuery>,
) -> ApiResult<Json<UserResponse>> {
    let user = accounts::current_user(&state.db, &actor.username).await?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_register_request_password_is_optional_on_the_wire() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username": "s1", "email": "s1@x", "role": "STAFF"}"#)
                .unwrap();

        assert!(req.password.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_login_request_rejects_blank_username() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username": "", "password": "p", "role": "STAFF"}"#).unwrap();

        let err = validation_error(req.validate().unwrap_err());
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Username is required"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }
}

/// User administration endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - List all accounts (passwords never included)
/// - `POST /api/users` - Create an account
/// - `PUT /api/users/:id` - Update an account
/// - `DELETE /api/users/:id` - Delete an account
///
/// Deleting an account that is still referenced by tasks (as creator or
/// assignee) is rejected; products survive their owner's deletion with a
/// null owner.

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use stockroom_shared::models::user::UserResponse;
use stockroom_shared::service::accounts::{self, AccountUpdate, NewAccount};
use validator::Validate;

use super::auth::RegisterRequest;

/// List handler
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = accounts::get_all_users(&state.db).await?;

    Ok(Json(users))
}

/// Create handler, reusing the registration body shape
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate().map_err(validation_error)?;

    let user = accounts::create_user(
        &state.db,
        NewAccount {
            username: req.username,
            email: req.email,
            password: req.password.unwrap_or_default(),
            role: req.role,
        },
    )
    .await?;

    Ok(Json(user))
}

/// Update handler
///
/// An absent or empty password keeps the stored one; everything else is
/// replaced.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate().map_err(validation_error)?;

    let user = accounts::update_user(
        &state.db,
        id,
        AccountUpdate {
            username: req.username,
            email: req.email,
            role: req.role,
            password: req.password,
        },
    )
    .await?;

    Ok(Json(user))
}

/// Delete handler
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    accounts::delete_user(&state.db, id).await?;

    Ok(())
}

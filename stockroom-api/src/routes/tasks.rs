/// Task lifecycle and per-user view endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks` - List all tasks
/// - `POST /api/tasks?createdBy=&assignedTo=` - Create a task
/// - `GET /api/tasks/:id` - Fetch one task (404 when missing)
/// - `PUT /api/tasks/:id?username=` - Partial update by an authorized actor
/// - `DELETE /api/tasks/:id?username=` - Delete by the creator or an admin
/// - `GET /api/tasks/assigned/:username` - Tasks assigned to a user
/// - `GET /api/tasks/created/:username` - Tasks created by a user
/// - `GET /api/tasks/overdue/:username` - Past-due, not-COMPLETED tasks
/// - `GET /api/tasks/stats/:username` - Per-user status counts
/// - `GET /api/tasks/staff` - Staff accounts, for assignment pickers

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use stockroom_shared::models::task::{Task, TaskPatch, TaskStats};
use stockroom_shared::models::user::UserResponse;
use stockroom_shared::service::tasks::{self, CreateTaskRequest};

use super::ActorQuery;

/// The `?createdBy=&assignedTo=` ownership pair on task creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipQuery {
    pub created_by: String,
    pub assigned_to: String,
}

/// Create handler
///
/// Ownership rides on the query string; the body carries the task fields.
pub async fn create_task(
    State(state): State<AppState>,
    Query(ownership): Query<OwnershipQuery>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = tasks::create_task(
        &state.db,
        req,
        &ownership.created_by,
        &ownership.assigned_to,
    )
    .await?;

    Ok(Json(task))
}

/// List handler
pub async fn get_all_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::get_all_tasks(&state.db).await?;

    Ok(Json(tasks))
}

/// Lookup handler; a missing task is a bare 404
pub async fn get_task_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = tasks::get_task_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}

/// Update handler
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(actor): Query<ActorQuery>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    let task = tasks::update_task(&state.db, id, patch, &actor.username).await?;

    Ok(Json(task))
}

/// Delete handler
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(actor): Query<ActorQuery>,
) -> ApiResult<()> {
    tasks::delete_task(&state.db, id, &actor.username).await?;

    Ok(())
}

/// Assigned-to view handler
pub async fn get_tasks_by_assigned_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::get_tasks_by_assigned(&state.db, &username).await?;

    Ok(Json(tasks))
}

/// Created-by view handler
pub async fn get_tasks_by_created_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::get_tasks_by_created(&state.db, &username).await?;

    Ok(Json(tasks))
}

/// Overdue view handler
pub async fn get_overdue_tasks(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::get_overdue_tasks(&state.db, &username).await?;

    Ok(Json(tasks))
}

/// Statistics handler
pub async fn get_task_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<TaskStats>> {
    let stats = tasks::get_task_stats(&state.db, &username).await?;

    Ok(Json(stats))
}

/// Staff-list handler
pub async fn get_staff_members(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let staff = tasks::get_staff_members(&state.db).await?;

    Ok(Json(staff))
}

/// Task lifecycle service
///
/// Every mutating operation here follows the same shape: resolve the actor
/// (and, for creation, the assignee), apply the policy, stamp the clock,
/// then hit the model. Resolution failures always outrank policy failures.

use crate::auth::{identity, policy};
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStats, TaskStatus};
use crate::models::user::{Role, User, UserResponse};
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

/// Request body for creating a task
///
/// Ownership comes from the `createdBy`/`assignedTo` query parameters, not
/// the body. Status and priority fall back to PENDING/MEDIUM when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDateTime>,
}

/// Creates a task on behalf of a creator, assigned to a staff member
///
/// # Errors
///
/// - `NotFound("Creator user not found")` / `NotFound("Assigned user not found")`
///   when either username doesn't resolve
/// - `Forbidden` when the creator isn't a manager or admin, or the assignee
///   isn't staff
pub async fn create_task(
    pool: &PgPool,
    request: CreateTaskRequest,
    created_by: &str,
    assigned_to: &str,
) -> ServiceResult<Task> {
    let creator = identity::resolve_or(pool, created_by, "Creator user not found").await?;
    let assignee = identity::resolve_or(pool, assigned_to, "Assigned user not found").await?;

    policy::require_create_permission(&creator, &assignee)?;

    let now = Utc::now().naive_utc();
    let task = Task::create(
        pool,
        NewTask {
            title: request.title,
            description: request.description,
            status: request.status.unwrap_or(TaskStatus::Pending),
            priority: request.priority.unwrap_or(TaskPriority::Medium),
            due_date: request.due_date,
            created_at: now,
            updated_at: now,
        },
        &creator,
        &assignee,
    )
    .await?;

    tracing::info!(
        task_id = task.id,
        created_by = %creator.username,
        assigned_to = %assignee.username,
        "Task created"
    );

    Ok(task)
}

/// Lists all tasks
pub async fn get_all_tasks(pool: &PgPool) -> ServiceResult<Vec<Task>> {
    Ok(Task::list(pool).await?)
}

/// Fetches a single task
pub async fn get_task_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<Task>> {
    Ok(Task::find_by_id(pool, id).await?)
}

/// Lists tasks assigned to a user
pub async fn get_tasks_by_assigned(pool: &PgPool, username: &str) -> ServiceResult<Vec<Task>> {
    let user = identity::resolve(pool, username).await?;
    Ok(Task::find_by_assigned_to(pool, user.id).await?)
}

/// Lists tasks created by a user
pub async fn get_tasks_by_created(pool: &PgPool, username: &str) -> ServiceResult<Vec<Task>> {
    let user = identity::resolve(pool, username).await?;
    Ok(Task::find_by_created_by(pool, user.id).await?)
}

/// Lists a user's overdue tasks (past due and not COMPLETED)
pub async fn get_overdue_tasks(pool: &PgPool, username: &str) -> ServiceResult<Vec<Task>> {
    let user = identity::resolve(pool, username).await?;
    Ok(Task::find_overdue_by_user(pool, user.id).await?)
}

/// Computes the per-user task statistics
pub async fn get_task_stats(pool: &PgPool, username: &str) -> ServiceResult<TaskStats> {
    let user = identity::resolve(pool, username).await?;
    Ok(Task::stats_for_user(pool, user.id).await?)
}

/// Lists all staff members, for assignment pickers
pub async fn get_staff_members(pool: &PgPool) -> ServiceResult<Vec<UserResponse>> {
    let staff = User::find_by_role(pool, Role::Staff).await?;
    Ok(staff.into_iter().map(UserResponse::from).collect())
}

/// Applies a partial update to a task on behalf of an actor
///
/// The task is loaded first, so a missing task reports `NotFound` before the
/// actor is resolved. An empty patch still stamps `updated_at`.
///
/// # Errors
///
/// - `NotFound("Task not found")` when the task doesn't exist
/// - `NotFound("User not found")` when the actor doesn't resolve
/// - `Forbidden` when the actor is neither the assignee, the creator, nor
///   an admin
pub async fn update_task(
    pool: &PgPool,
    id: i64,
    patch: TaskPatch,
    username: &str,
) -> ServiceResult<Task> {
    let task = Task::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let actor = identity::resolve(pool, username).await?;
    policy::require_update_permission(&actor, &task)?;

    let updated = Task::update(pool, id, patch, Utc::now().naive_utc())
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = id, updated_by = %actor.username, "Task updated");

    Ok(updated)
}

/// Deletes a task on behalf of an actor
///
/// # Errors
///
/// - `NotFound("Task not found")` when the task doesn't exist
/// - `NotFound("User not found")` when the actor doesn't resolve
/// - `Forbidden` when the actor is neither the creator nor an admin
pub async fn delete_task(pool: &PgPool, id: i64, username: &str) -> ServiceResult<()> {
    let task = Task::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let actor = identity::resolve(pool, username).await?;
    policy::require_delete_permission(&actor, &task)?;

    if !Task::delete(pool, id).await? {
        return Err(ServiceError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = id, deleted_by = %actor.username, "Task deleted");

    Ok(())
}

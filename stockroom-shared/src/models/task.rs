/// Task model and database operations
///
/// Tasks are the core entity of the system: created by managers or admins,
/// assigned to staff, and tracked through a simple status lifecycle.
///
/// # State Machine
///
/// ```text
/// PENDING → IN_PROGRESS → COMPLETED
/// ```
///
/// Transitions are unconstrained by the service; any authorized updater may
/// set any status, including regressions. The only state-sensitive behavior
/// is the overdue filter, which excludes COMPLETED tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
///     priority VARCHAR(20) NOT NULL DEFAULT 'MEDIUM',
///     due_date TIMESTAMP,
///     created_at TIMESTAMP NOT NULL,
///     updated_at TIMESTAMP NOT NULL,
///     created_by BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     assigned_to BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT
/// );
/// ```
///
/// Every read joins the creator and assignee rows so the wire shape carries
/// both users inline (minus passwords).

use crate::models::user::{User, UserResponse};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use std::fmt;
use std::str::FromStr;

/// Task status
///
/// Stored and serialized as the uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not yet started
    Pending,

    /// Being worked on
    InProgress,

    /// Finished; excluded from the overdue filter
    Completed,

    /// Abandoned
    Cancelled,
}

impl TaskStatus {
    /// Converts the status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "CANCELLED" => Ok(TaskStatus::Cancelled),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Converts the priority to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
            TaskPriority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(TaskPriority::Low),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "HIGH" => Ok(TaskPriority::High),
            "URGENT" => Ok(TaskPriority::Urgent),
            other => Err(format!("unknown task priority: {}", other)),
        }
    }
}

/// Task model with creator and assignee loaded inline
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date (naive UTC)
    pub due_date: Option<NaiveDateTime>,

    /// When the task was created
    pub created_at: NaiveDateTime,

    /// When the task was last updated
    pub updated_at: NaiveDateTime,

    /// The manager or admin who created the task
    pub created_by: UserResponse,

    /// The staff member the task is assigned to
    pub assigned_to: UserResponse,
}

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.priority, t.due_date, \
     t.created_at, t.updated_at, \
     c.id AS creator_id, c.username AS creator_username, c.email AS creator_email, \
     c.role AS creator_role, \
     a.id AS assignee_id, a.username AS assignee_username, a.email AS assignee_email, \
     a.role AS assignee_role";

/// Builds a task SELECT with both user joins and the given filter clause
fn task_query(filter: &str) -> String {
    format!(
        "SELECT {TASK_COLUMNS} FROM tasks t \
         JOIN users c ON c.id = t.created_by \
         JOIN users a ON a.id = t.assigned_to {filter}"
    )
}

fn decode_error(column: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.into(),
        source: message.into(),
    }
}

fn user_from_row(row: &PgRow, prefix: &str) -> Result<UserResponse, sqlx::Error> {
    let role_column = format!("{prefix}_role");
    let role: String = row.try_get(role_column.as_str())?;
    let role = role
        .parse()
        .map_err(|_| decode_error(&role_column, format!("unknown role: {}", role)))?;

    Ok(UserResponse {
        id: row.try_get(format!("{prefix}_id").as_str())?,
        username: row.try_get(format!("{prefix}_username").as_str())?,
        email: row.try_get(format!("{prefix}_email").as_str())?,
        role,
    })
}

impl<'r> FromRow<'r, PgRow> for Task {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse()
            .map_err(|e: String| decode_error("status", e))?;

        let priority: String = row.try_get("priority")?;
        let priority = priority
            .parse()
            .map_err(|e: String| decode_error("priority", e))?;

        Ok(Task {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status,
            priority,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            created_by: user_from_row(row, "creator")?,
            assigned_to: user_from_row(row, "assignee")?,
        })
    }
}

/// Input for inserting a new task
///
/// Ownership and timestamps are supplied by the task lifecycle service, not
/// by clients; the HTTP request type cannot express them.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a task
///
/// Absent fields are left unchanged. JSON `null` is indistinguishable from
/// absent, so a PUT cannot clear `description` or `dueDate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDateTime>,
}

impl TaskPatch {
    /// True when the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Per-user task statistics
///
/// Produced by a single statement so the four counts come from one row
/// snapshot. A completed-but-past-due task counts as completed, not overdue.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub overdue: i64,
}

impl Task {
    /// Creates a new task owned by the given creator and assignee
    ///
    /// The caller has already resolved and authorized both users; their rows
    /// are echoed into the returned task without a second read.
    pub async fn create(
        pool: &PgPool,
        data: NewTask,
        created_by: &User,
        assigned_to: &User,
    ) -> Result<Self, sqlx::Error> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date,
                               created_at, updated_at, created_by, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status.as_str())
        .bind(data.priority.as_str())
        .bind(data.due_date)
        .bind(data.created_at)
        .bind(data.updated_at)
        .bind(created_by.id)
        .bind(assigned_to.id)
        .fetch_one(pool)
        .await?;

        Ok(Task {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
            created_by: UserResponse::from(created_by),
            assigned_to: UserResponse::from(assigned_to),
        })
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&task_query("WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists all tasks
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&task_query("ORDER BY t.id"))
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Lists tasks assigned to a user
    pub async fn find_by_assigned_to(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks =
            sqlx::query_as::<_, Task>(&task_query("WHERE t.assigned_to = $1 ORDER BY t.id"))
                .bind(user_id)
                .fetch_all(pool)
                .await?;

        Ok(tasks)
    }

    /// Lists tasks created by a user
    pub async fn find_by_created_by(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&task_query("WHERE t.created_by = $1 ORDER BY t.id"))
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Lists overdue tasks assigned to a user
    ///
    /// Overdue means the due date is in the past and the status is not
    /// COMPLETED. "Now" is the database clock at query time, read in UTC to
    /// match the naive-UTC timestamps the service writes.
    pub async fn find_overdue_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&task_query(
            "WHERE t.assigned_to = $1 \
               AND t.due_date < (NOW() AT TIME ZONE 'utc') \
               AND t.status != 'COMPLETED' \
             ORDER BY t.id",
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts tasks assigned to a user with a given status
    pub async fn count_by_assigned_to_and_status(
        pool: &PgPool,
        user_id: i64,
        status: TaskStatus,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE assigned_to = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Computes the per-user statistics in a single statement
    ///
    /// One row snapshot, so pending + inProgress + completed always reconciles
    /// with the task list at the moment of the query.
    pub async fn stats_for_user(pool: &PgPool, user_id: i64) -> Result<TaskStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE status = 'IN_PROGRESS') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'COMPLETED') AS completed,
                COUNT(*) FILTER (WHERE due_date < (NOW() AT TIME ZONE 'utc')
                                   AND status != 'COMPLETED') AS overdue
            FROM tasks
            WHERE assigned_to = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Checks whether any task references a user as creator or assignee
    pub async fn exists_for_user(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM tasks WHERE assigned_to = $1 OR created_by = $1)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Applies a partial update and stamps `updated_at`
    ///
    /// Only fields present in the patch are written; ownership, `created_at`,
    /// and the id are never mutated through this path.
    ///
    /// # Returns
    ///
    /// The updated task if found, `None` if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: TaskPatch,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = $2");
        let mut bind_count = 2;

        if patch.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if patch.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if patch.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if patch.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1");

        let mut q = sqlx::query(&query).bind(id).bind(updated_at);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status.as_str());
        }
        if let Some(priority) = patch.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(due_date) = patch.due_date {
            q = q.bind(due_date);
        }

        let result = q.execute(pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "PENDING");
        assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(TaskStatus::Completed.as_str(), "COMPLETED");
        assert_eq!(TaskStatus::Cancelled.as_str(), "CANCELLED");
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"COMPLETED\"").unwrap(),
            TaskStatus::Completed
        );
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("urgent".parse::<TaskPriority>().unwrap(), TaskPriority::Urgent);
        assert!("CRITICAL".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_patch_absent_fields_stay_absent() {
        let patch: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());

        // Explicit null is indistinguishable from absent
        let patch: TaskPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(patch.description.is_none());
    }

    #[test]
    fn test_patch_parses_camel_case_due_date() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"dueDate": "2025-06-01T12:00:00", "status": "IN_PROGRESS"}"#)
                .unwrap();
        assert!(patch.due_date.is_some());
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_task_query_joins_both_users() {
        let sql = task_query("WHERE t.id = $1");
        assert!(sql.contains("JOIN users c ON c.id = t.created_by"));
        assert!(sql.contains("JOIN users a ON a.id = t.assigned_to"));
        assert!(sql.ends_with("WHERE t.id = $1"));
    }
}

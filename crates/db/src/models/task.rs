//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub milestone_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<chrono::NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Valid task status values.
pub const TASK_STATUSES: &[&str] = &["not_started", "in_progress", "completed"];

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub milestone_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `not_started` if omitted.
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<chrono::NaiveDate>,
}

/// DTO for updating an existing task. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub milestone_id: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<chrono::NaiveDate>,
}

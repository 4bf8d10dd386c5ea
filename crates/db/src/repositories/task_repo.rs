//! Repository for the `tasks` table.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, milestone_id, title, description, status, assignee_id, \
                       due_date, created_at, updated_at";

/// Completed/total task counts for a milestone.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct TaskCounts {
    pub total: i64,
    pub completed: i64,
}

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `not_started`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, milestone_id, title, description, status, assignee_id, due_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'not_started'), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(input.milestone_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.assignee_id)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's tasks ordered by due date (soonest first).
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = $1
             ORDER BY due_date ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List a milestone's tasks ordered by creation.
    pub async fn list_for_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE milestone_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(milestone_id)
            .fetch_all(pool)
            .await
    }

    /// Completed/total counts for a milestone's tasks. Feeds the derived
    /// progress percentage; nothing is persisted.
    pub async fn counts_for_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<TaskCounts, sqlx::Error> {
        sqlx::query_as::<_, TaskCounts>(
            "SELECT COUNT(*)::BIGINT AS total,
                    COUNT(*) FILTER (WHERE status = 'completed')::BIGINT AS completed
             FROM tasks WHERE milestone_id = $1",
        )
        .bind(milestone_id)
        .fetch_one(pool)
        .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                milestone_id = COALESCE($2, milestone_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                assignee_id = COALESCE($6, assignee_id),
                due_date = COALESCE($7, due_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.milestone_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.assignee_id)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `meetings` table.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::meeting::{CreateMeeting, Meeting, UpdateMeeting};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, scheduled_at, duration_minutes, location, notes, \
                       created_by, created_at, updated_at";

/// Provides CRUD operations for meetings.
pub struct MeetingRepo;

impl MeetingRepo {
    /// Insert a new meeting, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        created_by: DbId,
        input: &CreateMeeting,
    ) -> Result<Meeting, sqlx::Error> {
        let query = format!(
            "INSERT INTO meetings (project_id, title, scheduled_at, duration_minutes, location, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a meeting by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meetings WHERE id = $1");
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's meetings ordered by schedule (soonest first).
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Meeting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM meetings WHERE project_id = $1 ORDER BY scheduled_at ASC"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a meeting. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMeeting,
    ) -> Result<Option<Meeting>, sqlx::Error> {
        let query = format!(
            "UPDATE meetings SET
                title = COALESCE($2, title),
                scheduled_at = COALESCE($3, scheduled_at),
                duration_minutes = COALESCE($4, duration_minutes),
                location = COALESCE($5, location),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meeting>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(&input.location)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a meeting. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `milestones` table and its approval workflow.
//!
//! Workflow transitions (sign-off, approve/reject) run inside a
//! caller-managed transaction and guard on the optimistic `version`
//! column: the UPDATE matches only when the caller's last-read version is
//! still current, and increments it. A stale version matches zero rows,
//! which the handler surfaces as a conflict.

use sqlx::{PgConnection, PgPool};
use atelier_core::types::DbId;

use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, project_id, name, description, start_date, due_date, deliverables, \
    status, sign_off_by, sign_off_at, client_approval, approved_by, \
    approved_at, feedback, version, created_at, updated_at";

/// Provides CRUD and workflow operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Insert a new milestone in `planned` status, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones (project_id, name, description, start_date, due_date, deliverables)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(&input.deliverables)
            .fetch_one(pool)
            .await
    }

    /// Find a milestone by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a milestone by ID with a row lock, serializing concurrent
    /// workflow transitions on the same milestone.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a project's milestones ordered by due date (soonest first,
    /// undated last).
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE project_id = $1
             ORDER BY due_date ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a milestone's descriptive fields. Workflow fields (status,
    /// sign-off, approval) are owned by the transition methods below.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                due_date = COALESCE($5, due_date),
                deliverables = COALESCE($6, deliverables)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(&input.deliverables)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a milestone. Runs inside the caller's transaction
    /// so the audit append commits atomically with it. Returns `true` if a
    /// row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply the sign-off transition: record the actor and timestamp and
    /// move the milestone to `in_review`.
    ///
    /// Returns `None` when `expected_version` is stale (the row was
    /// mutated since the caller read it).
    pub async fn sign_off(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
        expected_version: i32,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                status = 'in_review',
                sign_off_by = $2,
                sign_off_at = NOW(),
                version = version + 1
             WHERE id = $1 AND version = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(user_id)
            .bind(expected_version)
            .fetch_optional(conn)
            .await
    }

    /// Apply the client decision.
    ///
    /// Approval completes the milestone and records the approver;
    /// rejection returns it to `in_progress`, clears the approver fields,
    /// and clears the sign-off so a fresh sign-off is required before the
    /// next decision. Feedback is stored either way.
    ///
    /// Returns `None` when `expected_version` is stale.
    pub async fn apply_decision(
        conn: &mut PgConnection,
        id: DbId,
        approved: bool,
        feedback: Option<&str>,
        approver_id: DbId,
        expected_version: i32,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        if approved {
            let query = format!(
                "UPDATE milestones SET
                    status = 'completed',
                    client_approval = TRUE,
                    approved_by = $2,
                    approved_at = NOW(),
                    feedback = $3,
                    version = version + 1
                 WHERE id = $1 AND version = $4
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, Milestone>(&query)
                .bind(id)
                .bind(approver_id)
                .bind(feedback)
                .bind(expected_version)
                .fetch_optional(conn)
                .await
        } else {
            let query = format!(
                "UPDATE milestones SET
                    status = 'in_progress',
                    client_approval = FALSE,
                    approved_by = NULL,
                    approved_at = NULL,
                    sign_off_by = NULL,
                    sign_off_at = NULL,
                    feedback = $2,
                    version = version + 1
                 WHERE id = $1 AND version = $3
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, Milestone>(&query)
                .bind(id)
                .bind(feedback)
                .bind(expected_version)
                .fetch_optional(conn)
                .await
        }
    }

    /// Milestones awaiting client decision, ordered by due date ascending.
    /// Admin view: every company, optionally narrowed to one project.
    pub async fn pending(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        match project_id {
            Some(pid) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM milestones
                     WHERE status = 'in_review' AND project_id = $1
                     ORDER BY due_date ASC NULLS LAST, id ASC"
                );
                sqlx::query_as::<_, Milestone>(&query)
                    .bind(pid)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM milestones
                     WHERE status = 'in_review'
                     ORDER BY due_date ASC NULLS LAST, id ASC"
                );
                sqlx::query_as::<_, Milestone>(&query).fetch_all(pool).await
            }
        }
    }

    /// Milestones awaiting client decision under the given companies,
    /// ordered by due date ascending. Non-admin view.
    pub async fn pending_for_companies(
        pool: &PgPool,
        company_ids: &[DbId],
        project_id: Option<DbId>,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let select = format!(
            "SELECT {}
             FROM milestones m
             JOIN projects p ON p.id = m.project_id
             WHERE m.status = 'in_review' AND p.company_id = ANY($1)",
            COLUMNS
                .split(", ")
                .map(|c| format!("m.{}", c.trim()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        match project_id {
            Some(pid) => {
                let query =
                    format!("{select} AND m.project_id = $2 ORDER BY m.due_date ASC NULLS LAST, m.id ASC");
                sqlx::query_as::<_, Milestone>(&query)
                    .bind(company_ids)
                    .bind(pid)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("{select} ORDER BY m.due_date ASC NULLS LAST, m.id ASC");
                sqlx::query_as::<_, Milestone>(&query)
                    .bind(company_ids)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}

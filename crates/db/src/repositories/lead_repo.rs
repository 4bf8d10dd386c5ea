//! Repository for the `leads` table.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::lead::{CreateLead, Lead, UpdateLead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, company_name, message, source, status, created_at, updated_at";

/// Provides operations for captured leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead in `new` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, email, company_name, message, source)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company_name)
            .bind(&input.message)
            .bind(&input.source)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List leads, optionally filtered by status, newest first.
    pub async fn list(pool: &PgPool, status: Option<&str>) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update a lead's pipeline status.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET status = COALESCE($2, status) WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}

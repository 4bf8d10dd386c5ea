//! Repository for the `companies` and `company_members` tables.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::company::{Company, CompanyMember, CreateCompany, UpdateCompany};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, contact_email, website, created_at, updated_at";

/// Provides CRUD operations for companies and their memberships.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, contact_email, website)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all companies ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY name");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                contact_email = COALESCE($3, contact_email),
                website = COALESCE($4, website)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.website)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a company. Cascades to projects and memberships.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a user to a company. Returns `false` if the membership already
    /// exists.
    pub async fn add_member(
        pool: &PgPool,
        company_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO company_members (company_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_company_members_pair DO NOTHING",
        )
        .bind(company_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a user from a company. Returns `true` if a membership was
    /// removed.
    pub async fn remove_member(
        pool: &PgPool,
        company_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM company_members WHERE company_id = $1 AND user_id = $2")
                .bind(company_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a company's members joined with their user summaries.
    pub async fn list_members(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<CompanyMember>, sqlx::Error> {
        sqlx::query_as::<_, CompanyMember>(
            "SELECT cm.id, cm.company_id, cm.user_id, u.display_name, u.email, u.role, cm.created_at
             FROM company_members cm
             JOIN users u ON u.id = cm.user_id
             WHERE cm.company_id = $1
             ORDER BY u.display_name",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// IDs of every company the user belongs to. Used by the access policy.
    pub async fn member_company_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT company_id FROM company_members WHERE user_id = $1 ORDER BY company_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `assets` table.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::asset::{Asset, CreateAsset, UpdateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, project_id, file_name, kind, mime_type, size_bytes, \
                       storage_key, uploaded_by, created_at, updated_at";

/// Provides CRUD operations for asset metadata.
pub struct AssetRepo;

impl AssetRepo {
    /// Register a new asset, returning the created row.
    pub async fn create(
        pool: &PgPool,
        uploaded_by: DbId,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (company_id, project_id, file_name, kind, mime_type, size_bytes, storage_key, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.company_id)
            .bind(input.project_id)
            .bind(&input.file_name)
            .bind(&input.kind)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(&input.storage_key)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets owned by any of the given companies.
    pub async fn list_for_companies(
        pool: &PgPool,
        company_ids: &[DbId],
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets WHERE company_id = ANY($1) ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(company_ids)
            .fetch_all(pool)
            .await
    }

    /// List all assets ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY created_at DESC");
        sqlx::query_as::<_, Asset>(&query).fetch_all(pool).await
    }

    /// Update asset metadata. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                file_name = COALESCE($2, file_name),
                project_id = COALESCE($3, project_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.file_name)
            .bind(input.project_id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an asset. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

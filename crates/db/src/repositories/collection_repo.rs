//! Repository for the `collections` and `collection_assets` tables.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::asset::Asset;
use crate::models::collection::{Collection, CreateCollection, UpdateCollection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, description, created_by, created_at, updated_at";

/// Provides CRUD operations for asset collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateCollection,
    ) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections (company_id, name, description, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(input.company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a collection by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List collections owned by any of the given companies.
    pub async fn list_for_companies(
        pool: &PgPool,
        company_ids: &[DbId],
    ) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM collections WHERE company_id = ANY($1) ORDER BY name"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(company_ids)
            .fetch_all(pool)
            .await
    }

    /// List all collections ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections ORDER BY name");
        sqlx::query_as::<_, Collection>(&query).fetch_all(pool).await
    }

    /// Update a collection. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCollection,
    ) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!(
            "UPDATE collections SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a collection. Membership rows cascade; assets
    /// themselves are untouched. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add an asset to a collection. Returns `false` if it was already a
    /// member.
    pub async fn add_asset(
        pool: &PgPool,
        collection_id: DbId,
        asset_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO collection_assets (collection_id, asset_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_collection_assets_pair DO NOTHING",
        )
        .bind(collection_id)
        .bind(asset_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an asset from a collection. Returns `true` if removed.
    pub async fn remove_asset(
        pool: &PgPool,
        collection_id: DbId,
        asset_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM collection_assets WHERE collection_id = $1 AND asset_id = $2",
        )
        .bind(collection_id)
        .bind(asset_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the assets in a collection, ordered by when they were added.
    pub async fn list_assets(
        pool: &PgPool,
        collection_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        sqlx::query_as::<_, Asset>(
            "SELECT a.id, a.company_id, a.project_id, a.file_name, a.kind, a.mime_type,
                    a.size_bytes, a.storage_key, a.uploaded_by, a.created_at, a.updated_at
             FROM collection_assets ca
             JOIN assets a ON a.id = ca.asset_id
             WHERE ca.collection_id = $1
             ORDER BY ca.created_at ASC",
        )
        .bind(collection_id)
        .fetch_all(pool)
        .await
    }
}

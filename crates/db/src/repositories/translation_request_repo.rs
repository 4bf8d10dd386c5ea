//! Repository for the `translation_requests` table.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::translation_request::{CreateTranslationRequest, TranslationRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, article_id, source_locale, target_locale, status, assignee_id, \
                       requested_by, created_at, updated_at";

/// Provides operations for translation work requests.
pub struct TranslationRequestRepo;

impl TranslationRequestRepo {
    /// Insert a new request in `pending` status, returning the created row.
    pub async fn create(
        pool: &PgPool,
        requested_by: DbId,
        input: &CreateTranslationRequest,
    ) -> Result<TranslationRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO translation_requests (article_id, source_locale, target_locale, requested_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TranslationRequest>(&query)
            .bind(input.article_id)
            .bind(&input.source_locale)
            .bind(&input.target_locale)
            .bind(requested_by)
            .fetch_one(pool)
            .await
    }

    /// Find a request by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TranslationRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM translation_requests WHERE id = $1");
        sqlx::query_as::<_, TranslationRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests, optionally filtered by article or assignee.
    pub async fn list(
        pool: &PgPool,
        article_id: Option<DbId>,
        assignee_id: Option<DbId>,
    ) -> Result<Vec<TranslationRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM translation_requests
             WHERE ($1::BIGINT IS NULL OR article_id = $1)
               AND ($2::BIGINT IS NULL OR assignee_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, TranslationRequest>(&query)
            .bind(article_id)
            .bind(assignee_id)
            .fetch_all(pool)
            .await
    }

    /// Assign the request to a user, moving it to `assigned`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assignee_id: DbId,
    ) -> Result<Option<TranslationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE translation_requests SET status = 'assigned', assignee_id = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TranslationRequest>(&query)
            .bind(id)
            .bind(assignee_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the request status. Transition legality is validated by the
    /// caller before this runs.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<TranslationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE translation_requests SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TranslationRequest>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}

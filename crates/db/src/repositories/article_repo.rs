//! Repository for the `articles` and `article_translations` tables.

use sqlx::PgPool;
use atelier_core::types::DbId;

use crate::models::article::{
    Article, ArticleTranslation, CreateArticle, UpdateArticle, UpsertTranslation,
};

/// Column list for `articles` queries.
const COLUMNS: &str = "id, slug, author_id, default_locale, status, created_at, updated_at";

/// Column list for `article_translations` queries.
const TRANSLATION_COLUMNS: &str = "id, article_id, locale, title, summary, body, status, \
                                   translated_by, created_at, updated_at";

/// Provides CRUD operations for articles and their translations.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article in `draft` status, returning the created row.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateArticle,
    ) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (slug, author_id, default_locale)
             VALUES ($1, $2, COALESCE($3, 'en'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.slug)
            .bind(author_id)
            .bind(&input.default_locale)
            .fetch_one(pool)
            .await
    }

    /// Find an article by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an article by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE slug = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all articles ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles ORDER BY created_at DESC");
        sqlx::query_as::<_, Article>(&query).fetch_all(pool).await
    }

    /// Update an article. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                slug = COALESCE($2, slug),
                default_locale = COALESCE($3, default_locale),
                status = COALESCE($4, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.default_locale)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an article. Cascades to translations and
    /// translation requests. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or replace the translation for one locale.
    pub async fn upsert_translation(
        pool: &PgPool,
        article_id: DbId,
        locale: &str,
        translated_by: DbId,
        input: &UpsertTranslation,
    ) -> Result<ArticleTranslation, sqlx::Error> {
        let query = format!(
            "INSERT INTO article_translations (article_id, locale, title, summary, body, status, translated_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'draft'), $7)
             ON CONFLICT ON CONSTRAINT uq_article_translations_locale DO UPDATE SET
                title = EXCLUDED.title,
                summary = EXCLUDED.summary,
                body = EXCLUDED.body,
                status = EXCLUDED.status,
                translated_by = EXCLUDED.translated_by
             RETURNING {TRANSLATION_COLUMNS}"
        );
        sqlx::query_as::<_, ArticleTranslation>(&query)
            .bind(article_id)
            .bind(locale)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(&input.status)
            .bind(translated_by)
            .fetch_one(pool)
            .await
    }

    /// All translations of an article, ordered by locale.
    pub async fn list_translations(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<ArticleTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM article_translations
             WHERE article_id = $1 ORDER BY locale"
        );
        sqlx::query_as::<_, ArticleTranslation>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a single locale's translation. Returns `true` if removed.
    pub async fn delete_translation(
        pool: &PgPool,
        article_id: DbId,
        locale: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM article_translations WHERE article_id = $1 AND locale = $2")
                .bind(article_id)
                .bind(locale)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

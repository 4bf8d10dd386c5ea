//! Article and article-translation entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// An article row from the `articles` table.
///
/// Content lives on the per-locale translations; the article itself only
/// carries identity, authorship, and publication status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub slug: String,
    pub author_id: Option<DbId>,
    pub default_locale: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Valid article status values.
pub const ARTICLE_STATUSES: &[&str] = &["draft", "published", "archived"];

/// An article translation row from the `article_translations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleTranslation {
    pub id: DbId,
    pub article_id: DbId,
    pub locale: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub status: String,
    pub translated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An article with the translation resolved for the requested locale.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedArticle {
    #[serde(flatten)]
    pub article: Article,
    /// The locale actually served (may be the default-locale fallback).
    pub resolved_locale: String,
    pub translation: ArticleTranslation,
}

/// DTO for creating a new article.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticle {
    pub slug: String,
    /// Defaults to `en` if omitted.
    pub default_locale: Option<String>,
}

/// DTO for updating an existing article. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateArticle {
    pub slug: Option<String>,
    pub default_locale: Option<String>,
    pub status: Option<String>,
}

/// DTO for upserting a translation in one locale.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertTranslation {
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
}

//! Handlers for articles and their per-locale translations.
//!
//! Staff manage articles and translations; published articles are served
//! publicly by slug with locale fallback resolution.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use atelier_core::error::CoreError;
use atelier_core::translation::{
    self, TranslationCandidate, VALID_TRANSLATION_STATUSES,
};
use atelier_core::types::DbId;
use atelier_db::models::article::{
    Article, CreateArticle, ResolvedArticle, UpdateArticle, UpsertTranslation, ARTICLE_STATUSES,
};
use atelier_db::repositories::ArticleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the public article read.
#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

/// Validate a URL slug: lowercase alphanumeric segments joined by hyphens.
fn validate_slug(slug: &str) -> AppResult<()> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits, and hyphens"
        ))))
    }
}

/// Load an article or fail with not-found.
async fn load_article(state: &AppState, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

/// POST /api/v1/articles
///
/// Create a draft article. Staff only.
pub async fn create(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    validate_slug(&input.slug)?;
    if let Some(ref locale) = input.default_locale {
        translation::validate_locale(locale)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let article = ArticleRepo::create(&state.pool, staff.user_id, &input).await?;
    tracing::info!(article_id = article.id, user_id = staff.user_id, "Article created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}

/// GET /api/v1/articles
///
/// List all articles. Staff only (public reads go through the by-slug
/// endpoint).
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let articles = ArticleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/articles/{id}
pub async fn get_by_id(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = load_article(&state, id).await?;
    Ok(Json(DataResponse { data: article }))
}

/// PUT /api/v1/articles/{id}
pub async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArticle>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref slug) = input.slug {
        validate_slug(slug)?;
    }
    if let Some(ref locale) = input.default_locale {
        translation::validate_locale(locale)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(ref status) = input.status {
        if !ARTICLE_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid article status '{status}'. Must be one of: {}",
                ARTICLE_STATUSES.join(", ")
            ))));
        }
    }

    let article = ArticleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;
    Ok(Json(DataResponse { data: article }))
}

/// DELETE /api/v1/articles/{id}
pub async fn delete(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ArticleRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(article_id = id, user_id = staff.user_id, "Article deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// PUT /api/v1/articles/{id}/translations/{locale}
///
/// Insert or replace the translation for one locale. Staff only.
pub async fn upsert_translation(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path((id, locale)): Path<(DbId, String)>,
    Json(input): Json<UpsertTranslation>,
) -> AppResult<impl IntoResponse> {
    translation::validate_locale(&locale)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if let Some(ref status) = input.status {
        if !VALID_TRANSLATION_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid translation status '{status}'. Must be one of: {}",
                VALID_TRANSLATION_STATUSES.join(", ")
            ))));
        }
    }

    load_article(&state, id).await?;

    let result =
        ArticleRepo::upsert_translation(&state.pool, id, &locale, staff.user_id, &input).await?;
    tracing::info!(
        article_id = id,
        locale = %locale,
        user_id = staff.user_id,
        "Translation upserted"
    );
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/articles/{id}/translations
pub async fn list_translations(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_article(&state, id).await?;
    let translations = ArticleRepo::list_translations(&state.pool, id).await?;
    Ok(Json(DataResponse { data: translations }))
}

/// DELETE /api/v1/articles/{id}/translations/{locale}
pub async fn delete_translation(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path((id, locale)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    let removed = ArticleRepo::delete_translation(&state.pool, id, &locale).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::BadRequest(format!(
            "No translation exists for locale '{locale}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Public read with locale fallback
// ---------------------------------------------------------------------------

/// GET /api/v1/articles/by-slug/{slug}?locale=de
///
/// Public read of a published article. The requested locale is served if
/// its translation is published, falling back to the article's default
/// locale; unpublished content is never served.
pub async fn get_resolved(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> AppResult<impl IntoResponse> {
    // No numeric id to report here; RowNotFound maps to a plain 404.
    let article = ArticleRepo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|a| a.status == "published")
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    let requested = match query.locale {
        Some(locale) => {
            translation::validate_locale(&locale)
                .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
            locale
        }
        None => article.default_locale.clone(),
    };

    let translations = ArticleRepo::list_translations(&state.pool, article.id).await?;
    let candidates: Vec<TranslationCandidate<'_>> = translations
        .iter()
        .map(|t| TranslationCandidate {
            locale: &t.locale,
            status: &t.status,
        })
        .collect();

    let index = translation::resolve_index(&requested, &article.default_locale, &candidates)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ArticleTranslation",
            id: article.id,
        }))?;
    let resolved = translations[index].clone();

    Ok(Json(DataResponse {
        data: ResolvedArticle {
            resolved_locale: resolved.locale.clone(),
            translation: resolved,
            article,
        },
    }))
}

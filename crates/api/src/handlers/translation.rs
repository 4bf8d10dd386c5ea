//! Handlers for translation work requests.
//!
//! Requests move through `pending -> assigned -> in_progress -> completed`
//! (any non-terminal state may be cancelled); transitions are validated in
//! `atelier_core::translation`. Assignment notifies the assignee.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use atelier_core::error::CoreError;
use atelier_core::translation::{self, REQUEST_ASSIGNED, VALID_REQUEST_STATUSES};
use atelier_core::types::DbId;
use atelier_db::models::notification::CreateNotification;
use atelier_db::models::translation_request::{
    AssignTranslationRequest, CreateTranslationRequest, TranslationRequest,
    UpdateTranslationRequestStatus,
};
use atelier_db::repositories::{ArticleRepo, TranslationRequestRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::notifications::queue_notification;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the request listing.
#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub article_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
}

/// Load a translation request or fail with not-found.
async fn load_request(state: &AppState, id: DbId) -> AppResult<TranslationRequest> {
    TranslationRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TranslationRequest",
            id,
        }))
}

/// POST /api/v1/translation-requests
///
/// Request a translation of an article into a target locale. Staff only.
pub async fn create(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateTranslationRequest>,
) -> AppResult<impl IntoResponse> {
    translation::validate_locale(&input.source_locale)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    translation::validate_locale(&input.target_locale)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if input.source_locale == input.target_locale {
        return Err(AppError::Core(CoreError::Validation(
            "Source and target locale must differ".into(),
        )));
    }

    ArticleRepo::find_by_id(&state.pool, input.article_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id: input.article_id,
        }))?;

    let request = TranslationRequestRepo::create(&state.pool, staff.user_id, &input).await?;
    tracing::info!(
        request_id = request.id,
        article_id = request.article_id,
        target_locale = %request.target_locale,
        "Translation request created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/translation-requests
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> AppResult<impl IntoResponse> {
    let requests =
        TranslationRequestRepo::list(&state.pool, query.article_id, query.assignee_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/translation-requests/{id}
pub async fn get_by_id(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = load_request(&state, id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/translation-requests/{id}/assign
///
/// Assign a pending request to a user and notify them.
pub async fn assign(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTranslationRequest>,
) -> AppResult<impl IntoResponse> {
    let request = load_request(&state, id).await?;

    translation::validate_request_transition(&request.status, REQUEST_ASSIGNED)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    UserRepo::find_by_id(&state.pool, input.assignee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.assignee_id,
        }))?;

    let updated = TranslationRequestRepo::assign(&state.pool, id, input.assignee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TranslationRequest",
            id,
        }))?;

    tracing::info!(
        request_id = id,
        assignee_id = input.assignee_id,
        assigned_by = staff.user_id,
        "Translation request assigned"
    );

    queue_notification(
        &state,
        CreateNotification {
            user_id: input.assignee_id,
            notif_type: "translation.assigned".to_string(),
            title: "Translation assigned to you".to_string(),
            message: format!(
                "You have been assigned a translation into '{}'.",
                updated.target_locale
            ),
            data: Some(serde_json::json!({
                "request_id": updated.id,
                "article_id": updated.article_id,
                "target_locale": updated.target_locale,
            })),
            project_id: None,
            milestone_id: None,
        },
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/translation-requests/{id}/status
///
/// Move a request through its workflow. The caller must be staff or the
/// request's assignee.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTranslationRequestStatus>,
) -> AppResult<impl IntoResponse> {
    if !VALID_REQUEST_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid translation request status '{}'. Must be one of: {}",
            input.status,
            VALID_REQUEST_STATUSES.join(", ")
        ))));
    }

    let request = load_request(&state, id).await?;

    let is_assignee = request.assignee_id == Some(auth.user_id);
    if !atelier_core::roles::is_staff(&auth.role) && !is_assignee {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only staff or the assignee may update this request".into(),
        )));
    }

    translation::validate_request_transition(&request.status, &input.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let updated = TranslationRequestRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TranslationRequest",
            id,
        }))?;

    tracing::info!(
        request_id = id,
        status = %updated.status,
        user_id = auth.user_id,
        "Translation request status updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

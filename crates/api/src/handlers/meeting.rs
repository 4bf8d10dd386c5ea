//! Handlers for project meetings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use atelier_core::error::CoreError;
use atelier_core::policy;
use atelier_core::types::DbId;
use atelier_db::models::meeting::{CreateMeeting, Meeting, UpdateMeeting};
use atelier_db::repositories::MeetingRepo;

use crate::access::{ensure_allowed, membership_ids};
use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a meeting or fail with not-found.
async fn load_meeting(state: &AppState, id: DbId) -> AppResult<Meeting> {
    MeetingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meeting",
            id,
        }))
}

/// POST /api/v1/projects/{project_id}/meetings
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateMeeting>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state, project_id).await?;
    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let meeting = MeetingRepo::create(&state.pool, project_id, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: meeting })))
}

/// GET /api/v1/projects/{project_id}/meetings
pub async fn list_for_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state, project_id).await?;
    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let meetings = MeetingRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: meetings }))
}

/// GET /api/v1/meetings/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let meeting = load_meeting(&state, id).await?;
    let project = load_project(&state, meeting.project_id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    Ok(Json(DataResponse { data: meeting }))
}

/// PUT /api/v1/meetings/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMeeting>,
) -> AppResult<impl IntoResponse> {
    let meeting = load_meeting(&state, id).await?;
    let project = load_project(&state, meeting.project_id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let updated = MeetingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meeting",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/meetings/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let meeting = load_meeting(&state, id).await?;
    let project = load_project(&state, meeting.project_id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let deleted = MeetingRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Meeting",
            id,
        }))
    }
}

//! Handlers for tasks.
//!
//! Tasks belong to a project and optionally to one of its milestones; the
//! milestone's progress percentage is derived from its tasks' statuses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use atelier_core::error::CoreError;
use atelier_core::policy;
use atelier_core::types::DbId;
use atelier_db::models::task::{CreateTask, Task, UpdateTask, TASK_STATUSES};
use atelier_db::repositories::{MilestoneRepo, TaskRepo};

use crate::access::{ensure_allowed, membership_ids};
use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate an optional task status against the accepted set.
fn validate_status(status: &Option<String>) -> AppResult<()> {
    if let Some(s) = status {
        if !TASK_STATUSES.contains(&s.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid task status '{s}'. Must be one of: {}",
                TASK_STATUSES.join(", ")
            ))));
        }
    }
    Ok(())
}

/// Check that a referenced milestone exists and belongs to the project.
async fn validate_milestone_link(
    state: &AppState,
    project_id: DbId,
    milestone_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(mid) = milestone_id {
        let milestone = MilestoneRepo::find_by_id(&state.pool, mid)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Milestone",
                id: mid,
            }))?;
        if milestone.project_id != project_id {
            return Err(AppError::Core(CoreError::Validation(
                "Milestone belongs to a different project".into(),
            )));
        }
    }
    Ok(())
}

/// Load a task or fail with not-found.
async fn load_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

/// POST /api/v1/projects/{project_id}/tasks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    let project = load_project(&state, project_id).await?;
    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    validate_milestone_link(&state, project_id, input.milestone_id).await?;

    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/projects/{project_id}/tasks
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

    let tasks = TaskRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = load_task(&state, id).await?;
    let project = load_project(&state, task.project_id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    let task = load_task(&state, id).await?;
    let project = load_project(&state, task.project_id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    validate_milestone_link(&state, task.project_id, input.milestone_id).await?;

    let updated = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let task = load_task(&state, id).await?;
    let project = load_project(&state, task.project_id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let deleted = TaskRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

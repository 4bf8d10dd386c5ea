//! Handlers for the `/projects` resource.
//!
//! Read access requires company membership (or admin); mutations require
//! an internal team role on the owning company. Deletion is admin-only and
//! hard-deletes with cascade.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use atelier_core::audit::{action_types, entity_types};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::{policy, roles};
use atelier_db::models::audit::CreateAuditLog;
use atelier_db::models::project::{CreateProject, Project, UpdateProject, PROJECT_STATUSES};
use atelier_db::repositories::{AuditLogRepo, CompanyRepo, ProjectRepo};

use crate::access::{ensure_allowed, membership_ids};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate an optional project status against the accepted set.
fn validate_status(status: &Option<String>) -> AppResult<()> {
    if let Some(s) = status {
        if !PROJECT_STATUSES.contains(&s.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid project status '{s}'. Must be one of: {}",
                PROJECT_STATUSES.join(", ")
            ))));
        }
    }
    Ok(())
}

/// Load a project or fail with not-found.
pub async fn load_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// POST /api/v1/projects
///
/// Create a project under a company the caller staffs.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    CompanyRepo::find_by_id(&state.pool, input.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: input.company_id,
        }))?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        input.company_id,
    ))?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(
        project_id = project.id,
        company_id = project.company_id,
        user_id = auth.user_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// Admins see every project; everyone else sees projects under companies
/// they belong to (empty list with no memberships).
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let projects = if auth.role == roles::ROLE_ADMIN {
        ProjectRepo::list(&state.pool).await?
    } else {
        let memberships = membership_ids(&state.pool, &auth).await?;
        if memberships.is_empty() {
            Vec::new()
        } else {
            ProjectRepo::list_for_companies(&state.pool, &memberships).await?
        }
    };
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;

    let project = load_project(&state, id).await?;
    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let updated = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/projects/{id}
///
/// Hard-delete a project. Admin only; milestones, tasks, and meetings
/// cascade.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = load_project(&state, id).await?;

    let mut tx = state.pool.begin().await?;
    ProjectRepo::delete(&mut tx, id).await?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(admin.user_id),
            action_type: action_types::ENTITY_DELETE.to_string(),
            entity_type: Some(entity_types::PROJECT.to_string()),
            entity_id: Some(id),
            old_value: Some(serde_json::to_value(&project).unwrap_or_default()),
            new_value: None,
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(project_id = id, user_id = admin.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

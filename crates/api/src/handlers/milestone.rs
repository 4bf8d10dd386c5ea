//! Handlers for milestones and the client approval workflow.
//!
//! The workflow transitions (sign-off, approve/reject) run their milestone
//! update and audit append inside one transaction, guarded by the
//! optimistic `version` token. Notifications are queued after commit and
//! are best-effort.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use atelier_core::audit::{action_types, entity_types};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::{milestone as workflow, policy, roles};
use atelier_db::models::audit::CreateAuditLog;
use atelier_db::models::milestone::{
    ApprovalRequest, CreateMilestone, Milestone, MilestoneWithProgress, PendingApproval,
    SignOffRequest, UpdateMilestone,
};
use atelier_db::models::notification::CreateNotification;
use atelier_db::models::project::Project;
use atelier_db::repositories::{
    AuditLogRepo, MilestoneRepo, ProjectRepo, TaskRepo, UserRepo,
};

use crate::access::{ensure_allowed, membership_ids};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::queue_for_users;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the pending-approvals listing.
#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub project_id: Option<DbId>,
}

/// Load the milestone's owning project, treating a missing milestone as
/// not-found before any access decision is made.
async fn load_context(
    state: &AppState,
    milestone_id: DbId,
) -> AppResult<(Milestone, Project)> {
    let milestone = MilestoneRepo::find_by_id(&state.pool, milestone_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id: milestone_id,
        }))?;
    let project = ProjectRepo::find_by_id(&state.pool, milestone.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: milestone.project_id,
        }))?;
    Ok((milestone, project))
}

/// Attach derived task progress to a milestone.
async fn with_progress(
    state: &AppState,
    milestone: Milestone,
) -> AppResult<MilestoneWithProgress> {
    let counts = TaskRepo::counts_for_milestone(&state.pool, milestone.id).await?;
    Ok(MilestoneWithProgress {
        progress_pct: workflow::task_progress(counts.completed, counts.total),
        total_tasks: counts.total,
        completed_tasks: counts.completed,
        milestone,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/milestones
///
/// Create a milestone. Caller must be staff on the project's company.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateMilestone>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let milestone = MilestoneRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        milestone_id = milestone.id,
        project_id,
        user_id = auth.user_id,
        "Milestone created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: milestone })))
}

/// GET /api/v1/projects/{project_id}/milestones
///
/// List a project's milestones with derived task progress.
pub async fn list_for_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let milestones = MilestoneRepo::list_for_project(&state.pool, project_id).await?;
    let mut enriched = Vec::with_capacity(milestones.len());
    for milestone in milestones {
        enriched.push(with_progress(&state, milestone).await?);
    }
    Ok(Json(DataResponse { data: enriched }))
}

/// GET /api/v1/milestones/{id}
///
/// Fetch one milestone with derived task progress.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (milestone, project) = load_context(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let enriched = with_progress(&state, milestone).await?;
    Ok(Json(DataResponse { data: enriched }))
}

/// PUT /api/v1/milestones/{id}
///
/// Update descriptive fields. Workflow fields are owned by the
/// transitions below.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestone>,
) -> AppResult<impl IntoResponse> {
    let (_, project) = load_context(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    let milestone = MilestoneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    Ok(Json(DataResponse { data: milestone }))
}

/// DELETE /api/v1/milestones/{id}
///
/// Hard-delete a milestone. Admin only; cascades to its task links.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (milestone, _) = load_context(&state, id).await?;

    let mut tx = state.pool.begin().await?;
    MilestoneRepo::delete(&mut tx, id).await?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(admin.user_id),
            action_type: action_types::ENTITY_DELETE.to_string(),
            entity_type: Some(entity_types::MILESTONE.to_string()),
            entity_id: Some(id),
            old_value: Some(serde_json::to_value(&milestone).unwrap_or_default()),
            new_value: None,
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(milestone_id = id, user_id = admin.user_id, "Milestone deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Sign-off
// ---------------------------------------------------------------------------

/// POST /api/v1/milestones/{id}/sign-off
///
/// Internal confirmation that the milestone is ready for client review.
/// Moves the milestone to `in_review` and notifies the company's clients.
pub async fn sign_off(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SignOffRequest>,
) -> AppResult<impl IntoResponse> {
    let (milestone, project) = load_context(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    workflow::can_sign_off(&milestone.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let mut tx = state.pool.begin().await?;
    // Lock the row so concurrent transitions serialize; the version guard
    // below then decides the winner.
    let locked = MilestoneRepo::find_by_id_for_update(&mut tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    if locked.version != input.version {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Milestone was modified by someone else (expected version {}, found {})",
            input.version, locked.version
        ))));
    }

    let updated = MilestoneRepo::sign_off(&mut tx, id, auth.user_id, input.version)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Milestone was modified by someone else".into(),
            ))
        })?;

    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(auth.user_id),
            action_type: action_types::SIGN_OFF.to_string(),
            entity_type: Some(entity_types::MILESTONE.to_string()),
            entity_id: Some(id),
            old_value: Some(serde_json::json!({
                "status": milestone.status,
                "version": milestone.version,
            })),
            new_value: Some(serde_json::json!({
                "status": updated.status,
                "sign_off_by": updated.sign_off_by,
                "version": updated.version,
            })),
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        milestone_id = id,
        user_id = auth.user_id,
        "Milestone signed off for client review"
    );

    // Post-commit, best-effort: one notification per client on the company.
    let clients =
        UserRepo::ids_by_roles_for_company(&state.pool, project.company_id, &[roles::ROLE_CLIENT])
            .await?;
    queue_for_users(
        &state,
        &clients,
        &CreateNotification {
            user_id: 0, // replaced per recipient
            notif_type: "milestone.awaiting_approval".to_string(),
            title: "Milestone awaiting your approval".to_string(),
            message: format!(
                "Milestone '{}' has been signed off and awaits your review.",
                updated.name
            ),
            data: Some(serde_json::json!({ "milestone_name": updated.name })),
            project_id: Some(project.id),
            milestone_id: Some(updated.id),
        },
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Approve / Reject
// ---------------------------------------------------------------------------

/// POST /api/v1/milestones/{id}/approval
///
/// Client decision on a milestone in review. Approval completes the
/// milestone; rejection returns it to `in_progress` with feedback and
/// requires a fresh sign-off before the next decision.
pub async fn decide(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApprovalRequest>,
) -> AppResult<impl IntoResponse> {
    let (milestone, project) = load_context(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::milestone_decide(
        &auth.role,
        &memberships,
        project.company_id,
    ))?;

    workflow::can_decide(&milestone.status)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let mut tx = state.pool.begin().await?;
    let locked = MilestoneRepo::find_by_id_for_update(&mut tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    if locked.version != input.version {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Milestone was modified by someone else (expected version {}, found {})",
            input.version, locked.version
        ))));
    }

    let updated = MilestoneRepo::apply_decision(
        &mut tx,
        id,
        input.approved,
        input.feedback.as_deref(),
        auth.user_id,
        input.version,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Milestone was modified by someone else".into(),
        ))
    })?;

    let action = if input.approved {
        action_types::APPROVE
    } else {
        action_types::REJECT
    };
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(auth.user_id),
            action_type: action.to_string(),
            entity_type: Some(entity_types::MILESTONE.to_string()),
            entity_id: Some(id),
            old_value: Some(serde_json::json!({
                "status": milestone.status,
                "client_approval": milestone.client_approval,
                "version": milestone.version,
            })),
            new_value: Some(serde_json::json!({
                "status": updated.status,
                "client_approval": updated.client_approval,
                "feedback": updated.feedback,
                "version": updated.version,
            })),
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        milestone_id = id,
        user_id = auth.user_id,
        approved = input.approved,
        "Milestone decision recorded"
    );

    // Post-commit, best-effort: notify the internal team of the decision.
    let staff = UserRepo::ids_by_roles_for_company(
        &state.pool,
        project.company_id,
        roles::STAFF_ROLES,
    )
    .await?;
    let (title, message) = if input.approved {
        (
            "Milestone approved".to_string(),
            format!("The client approved milestone '{}'.", updated.name),
        )
    } else {
        (
            "Milestone rejected".to_string(),
            format!(
                "The client rejected milestone '{}'.{}",
                updated.name,
                updated
                    .feedback
                    .as_deref()
                    .map(|f| format!(" Feedback: {f}"))
                    .unwrap_or_default()
            ),
        )
    };
    queue_for_users(
        &state,
        &staff,
        &CreateNotification {
            user_id: 0, // replaced per recipient
            notif_type: "milestone.decision".to_string(),
            title,
            message,
            data: Some(serde_json::json!({
                "approved": input.approved,
                "feedback": updated.feedback,
            })),
            project_id: Some(project.id),
            milestone_id: Some(updated.id),
        },
    )
    .await;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Pending approvals
// ---------------------------------------------------------------------------

/// GET /api/v1/milestones/pending-approvals
///
/// Milestones awaiting a client decision, ordered by due date ascending.
/// Admins see all companies; everyone else sees only milestones under
/// companies they belong to (empty list with no memberships).
pub async fn pending_approvals(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> AppResult<impl IntoResponse> {
    let milestones = if auth.role == roles::ROLE_ADMIN {
        MilestoneRepo::pending(&state.pool, query.project_id).await?
    } else {
        let memberships = membership_ids(&state.pool, &auth).await?;
        if memberships.is_empty() {
            return Ok(Json(DataResponse {
                data: Vec::<PendingApproval>::new(),
            }));
        }
        MilestoneRepo::pending_for_companies(&state.pool, &memberships, query.project_id).await?
    };

    let mut entries = Vec::with_capacity(milestones.len());
    for milestone in milestones {
        let tasks = TaskRepo::list_for_milestone(&state.pool, milestone.id).await?;
        let signed_off_by = match milestone.sign_off_by {
            Some(user_id) => UserRepo::summary_by_id(&state.pool, user_id).await?,
            None => None,
        };
        entries.push(PendingApproval {
            milestone,
            tasks,
            signed_off_by,
        });
    }

    Ok(Json(DataResponse { data: entries }))
}

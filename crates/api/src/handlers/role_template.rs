//! Handlers for role permission templates.
//!
//! A template overrides the hardcoded default permission set for a role.
//! Upserts and deletes are admin-only and audited atomically.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use atelier_core::audit::{action_types, entity_types};
use atelier_core::error::CoreError;
use atelier_core::{permissions, roles};
use atelier_db::models::audit::CreateAuditLog;
use atelier_db::models::role_template::UpsertRoleTemplate;
use atelier_db::repositories::{AuditLogRepo, RoleTemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/role-templates
///
/// List all role templates. Admin only.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = RoleTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// PUT /api/v1/admin/role-templates/{role}
///
/// Insert or replace the template for a role. Audited with the previous
/// permission set (if any) in the same transaction.
pub async fn upsert(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(input): Json<UpsertRoleTemplate>,
) -> AppResult<impl IntoResponse> {
    roles::validate_role(&role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    permissions::validate_permissions(&input.permissions)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let before = RoleTemplateRepo::find_by_role(&state.pool, &role).await?;

    let mut tx = state.pool.begin().await?;
    let template = RoleTemplateRepo::upsert(&mut tx, &role, &input.permissions).await?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(admin.user_id),
            action_type: action_types::ROLE_TEMPLATE_UPSERT.to_string(),
            entity_type: Some(entity_types::ROLE_TEMPLATE.to_string()),
            entity_id: Some(template.id),
            old_value: before
                .map(|t| serde_json::json!({ "permissions": t.permissions })),
            new_value: Some(serde_json::json!({ "permissions": template.permissions })),
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(role = %role, changed_by = admin.user_id, "Role template upserted");
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/admin/role-templates/{role}
///
/// Remove the template for a role, restoring the hardcoded defaults.
/// Audited with the removed permission set.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<StatusCode> {
    roles::validate_role(&role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let mut tx = state.pool.begin().await?;
    let removed = RoleTemplateRepo::delete(&mut tx, &role).await?.ok_or_else(|| {
        AppError::BadRequest(format!("No role template exists for role '{role}'"))
    })?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(admin.user_id),
            action_type: action_types::ROLE_TEMPLATE_DELETE.to_string(),
            entity_type: Some(entity_types::ROLE_TEMPLATE.to_string()),
            entity_id: Some(removed.id),
            old_value: Some(serde_json::json!({ "permissions": removed.permissions })),
            new_value: None,
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(role = %role, changed_by = admin.user_id, "Role template deleted");
    Ok(StatusCode::NO_CONTENT)
}

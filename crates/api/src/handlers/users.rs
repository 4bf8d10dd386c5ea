//! Handlers for admin user management and permission tooling.
//!
//! All endpoints require the admin role. Permission changes and
//! download-access toggles commit atomically with their audit entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use atelier_core::audit::{action_types, entity_types};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::{permissions, roles};
use atelier_db::models::audit::CreateAuditLog;
use atelier_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use atelier_db::repositories::{AuditLogRepo, RoleTemplateRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
}

/// Request body for `PUT /admin/users/{id}/permissions`.
#[derive(Debug, Deserialize)]
pub struct SetPermissionsRequest {
    pub permissions: Vec<String>,
}

/// Request body for `PUT /admin/users/{id}/download-access`.
#[derive(Debug, Deserialize)]
pub struct SetDownloadAccessRequest {
    pub enabled: bool,
}

/// Load a user or fail with not-found.
async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// POST /api/v1/admin/users
///
/// Create a user with a hashed password. Admin only.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    roles::validate_role(&input.role)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            display_name: input.display_name,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// GET /api/v1/admin/users
///
/// List all users. Admin only.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update profile fields, role, or active flag. Admin only.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref role) = input.role {
        roles::validate_role(role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, updated_by = admin.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/admin/users/{id}/permissions
///
/// Replace a user's additional permissions. Audited with old and new
/// values in the same transaction.
pub async fn set_permissions(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPermissionsRequest>,
) -> AppResult<impl IntoResponse> {
    permissions::validate_permissions(&input.permissions)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let before = load_user(&state, id).await?;

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::set_permissions(&mut tx, id, &input.permissions)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(admin.user_id),
            action_type: action_types::PERMISSION_CHANGE.to_string(),
            entity_type: Some(entity_types::USER.to_string()),
            entity_id: Some(id),
            old_value: Some(serde_json::json!({
                "additional_permissions": before.additional_permissions,
            })),
            new_value: Some(serde_json::json!({
                "additional_permissions": user.additional_permissions,
            })),
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = id, changed_by = admin.user_id, "Permissions updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/admin/users/{id}/download-access
///
/// Toggle a user's asset download access. Audited with old and new
/// values in the same transaction.
pub async fn set_download_access(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetDownloadAccessRequest>,
) -> AppResult<impl IntoResponse> {
    let before = load_user(&state, id).await?;

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::set_download_access(&mut tx, id, input.enabled)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    AuditLogRepo::append(
        &mut tx,
        &CreateAuditLog {
            user_id: Some(admin.user_id),
            action_type: action_types::DOWNLOAD_ACCESS_CHANGE.to_string(),
            entity_type: Some(entity_types::USER.to_string()),
            entity_id: Some(id),
            old_value: Some(serde_json::json!({ "download_access": before.download_access })),
            new_value: Some(serde_json::json!({ "download_access": user.download_access })),
            ip_address: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = id,
        enabled = input.enabled,
        changed_by = admin.user_id,
        "Download access updated"
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// GET /api/v1/admin/users/{id}/effective-permissions
///
/// Resolve the user's effective permission set: the role template override
/// (or hardcoded role defaults) unioned with their additional permissions.
pub async fn effective_permissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state, id).await?;

    let template = RoleTemplateRepo::find_by_role(&state.pool, &user.role).await?;
    let effective = permissions::effective_permissions(
        &user.role,
        template.as_ref().map(|t| t.permissions.as_slice()),
        &user.additional_permissions,
    );

    Ok(Json(DataResponse {
        data: serde_json::json!({
            "user_id": user.id,
            "role": user.role,
            "effective_permissions": effective,
        }),
    }))
}

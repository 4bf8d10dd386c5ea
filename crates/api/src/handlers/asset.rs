//! Handlers for asset metadata.
//!
//! Assets are company-scoped metadata records; no file bytes pass through
//! this API. Reads require membership of the owning company, mutations a
//! staff role on it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::{policy, roles};
use atelier_db::models::asset::{Asset, CreateAsset, UpdateAsset, ASSET_KINDS};
use atelier_db::repositories::{AssetRepo, CompanyRepo};

use crate::access::{ensure_allowed, membership_ids};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load an asset or fail with not-found.
pub async fn load_asset(state: &AppState, id: DbId) -> AppResult<Asset> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))
}

/// POST /api/v1/assets
///
/// Register asset metadata under a company the caller staffs.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    if !ASSET_KINDS.contains(&input.kind.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid asset kind '{}'. Must be one of: {}",
            input.kind,
            ASSET_KINDS.join(", ")
        ))));
    }

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

    let asset = AssetRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        asset_id = asset.id,
        company_id = asset.company_id,
        user_id = auth.user_id,
        "Asset registered"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets
///
/// Admins see every asset; everyone else sees assets under companies they
/// belong to.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let assets = if auth.role == roles::ROLE_ADMIN {
        AssetRepo::list(&state.pool).await?
    } else {
        let memberships = membership_ids(&state.pool, &auth).await?;
        if memberships.is_empty() {
            Vec::new()
        } else {
            AssetRepo::list_for_companies(&state.pool, &memberships).await?
        }
    };
    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = load_asset(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        asset.company_id,
    ))?;

    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/assets/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = load_asset(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        asset.company_id,
    ))?;

    let updated = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let asset = load_asset(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        asset.company_id,
    ))?;

    let deleted = AssetRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(asset_id = id, user_id = auth.user_id, "Asset deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))
    }
}

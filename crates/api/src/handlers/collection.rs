//! Handlers for asset collections.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::{policy, roles};
use atelier_db::models::collection::{
    AddCollectionAsset, Collection, CreateCollection, UpdateCollection,
};
use atelier_db::repositories::{CollectionRepo, CompanyRepo};

use crate::access::{ensure_allowed, membership_ids};
use crate::error::{AppError, AppResult};
use crate::handlers::asset::load_asset;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a collection or fail with not-found.
async fn load_collection(state: &AppState, id: DbId) -> AppResult<Collection> {
    CollectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        }))
}

/// POST /api/v1/collections
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCollection>,
) -> AppResult<impl IntoResponse> {
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

    let collection = CollectionRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: collection }),
    ))
}

/// GET /api/v1/collections
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let collections = if auth.role == roles::ROLE_ADMIN {
        CollectionRepo::list(&state.pool).await?
    } else {
        let memberships = membership_ids(&state.pool, &auth).await?;
        if memberships.is_empty() {
            Vec::new()
        } else {
            CollectionRepo::list_for_companies(&state.pool, &memberships).await?
        }
    };
    Ok(Json(DataResponse { data: collections }))
}

/// GET /api/v1/collections/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let collection = load_collection(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        collection.company_id,
    ))?;

    Ok(Json(DataResponse { data: collection }))
}

/// PUT /api/v1/collections/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCollection>,
) -> AppResult<impl IntoResponse> {
    let collection = load_collection(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        collection.company_id,
    ))?;

    let updated = CollectionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/collections/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let collection = load_collection(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        collection.company_id,
    ))?;

    let deleted = CollectionRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        }))
    }
}

/// GET /api/v1/collections/{id}/assets
pub async fn list_assets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let collection = load_collection(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_read(
        &auth.role,
        &memberships,
        collection.company_id,
    ))?;

    let assets = CollectionRepo::list_assets(&state.pool, id).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/collections/{id}/assets
///
/// Add an asset to the collection. The asset must belong to the same
/// company as the collection.
pub async fn add_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddCollectionAsset>,
) -> AppResult<impl IntoResponse> {
    let collection = load_collection(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        collection.company_id,
    ))?;

    let asset = load_asset(&state, input.asset_id).await?;
    if asset.company_id != collection.company_id {
        return Err(AppError::Core(CoreError::Validation(
            "Asset belongs to a different company".into(),
        )));
    }

    let added = CollectionRepo::add_asset(&state.pool, id, input.asset_id).await?;
    if !added {
        return Err(AppError::Core(CoreError::Conflict(
            "Asset is already in this collection".into(),
        )));
    }
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: serde_json::json!({ "added": true }),
        }),
    ))
}

/// DELETE /api/v1/collections/{id}/assets/{asset_id}
pub async fn remove_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, asset_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let collection = load_collection(&state, id).await?;

    let memberships = membership_ids(&state.pool, &auth).await?;
    ensure_allowed(policy::project_staff_write(
        &auth.role,
        &memberships,
        collection.company_id,
    ))?;

    let removed = CollectionRepo::remove_asset(&state.pool, id, asset_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::BadRequest(
            "Asset is not in this collection".into(),
        ))
    }
}

//! Handlers for companies (tenants) and their memberships.
//!
//! Company management is admin-only; membership determines what every
//! non-admin user can see elsewhere in the API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::company::{Company, CreateCompany, UpdateCompany};
use atelier_db::repositories::{CompanyRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/companies/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
}

/// Load a company or fail with not-found.
async fn load_company(state: &AppState, id: DbId) -> AppResult<Company> {
    CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))
}

/// POST /api/v1/admin/companies
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> AppResult<impl IntoResponse> {
    let company = CompanyRepo::create(&state.pool, &input).await?;
    tracing::info!(
        company_id = company.id,
        created_by = admin.user_id,
        "Company created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// GET /api/v1/admin/companies
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/admin/companies/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let company = load_company(&state, id).await?;
    Ok(Json(DataResponse { data: company }))
}

/// PUT /api/v1/admin/companies/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<impl IntoResponse> {
    let company = CompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(DataResponse { data: company }))
}

/// DELETE /api/v1/admin/companies/{id}
///
/// Hard-delete a company. Projects and memberships cascade.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CompanyRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }));
    }
    tracing::info!(company_id = id, deleted_by = admin.user_id, "Company deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/companies/{id}/members
pub async fn list_members(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_company(&state, id).await?;
    let members = CompanyRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/admin/companies/{id}/members
pub async fn add_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<impl IntoResponse> {
    load_company(&state, id).await?;
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    let added = CompanyRepo::add_member(&state.pool, id, input.user_id).await?;
    if !added {
        return Err(AppError::Core(CoreError::Conflict(
            "User is already a member of this company".into(),
        )));
    }

    tracing::info!(
        company_id = id,
        user_id = input.user_id,
        added_by = admin.user_id,
        "Company member added"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: serde_json::json!({ "added": true }),
        }),
    ))
}

/// DELETE /api/v1/admin/companies/{id}/members/{user_id}
pub async fn remove_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = CompanyRepo::remove_member(&state.pool, id, user_id).await?;
    if !removed {
        return Err(AppError::BadRequest(
            "User is not a member of this company".into(),
        ));
    }
    tracing::info!(
        company_id = id,
        user_id,
        removed_by = admin.user_id,
        "Company member removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

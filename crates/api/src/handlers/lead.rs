//! Handlers for lead capture and pipeline management.
//!
//! Capture is the one unauthenticated write in the API (it backs the
//! public contact form), so its input is validated strictly. Listing and
//! status updates are staff-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::lead::{CreateLead, UpdateLead, LEAD_STATUSES};
use atelier_db::repositories::LeadRepo;
use atelier_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the public capture endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct CaptureLeadRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    #[validate(length(max = 100))]
    pub source: Option<String>,
}

/// Query parameters for the lead listing.
#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    pub status: Option<String>,
}

/// POST /api/v1/leads
///
/// Public lead capture. No authentication; input is schema-validated.
pub async fn capture(
    State(state): State<AppState>,
    Json(input): Json<CaptureLeadRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let lead = LeadRepo::create(
        &state.pool,
        &CreateLead {
            name: input.name,
            email: input.email,
            company_name: input.company_name,
            message: input.message,
            source: input.source,
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new("lead.captured")
            .with_source("lead", lead.id)
            .with_payload(serde_json::json!({ "source": lead.source })),
    );

    tracing::info!(lead_id = lead.id, "Lead captured");
    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/v1/leads
///
/// List leads, optionally filtered by pipeline status. Staff only.
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<LeadListQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = query.status {
        if !LEAD_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid lead status '{status}'. Must be one of: {}",
                LEAD_STATUSES.join(", ")
            ))));
        }
    }

    let leads = LeadRepo::list(&state.pool, query.status.as_deref()).await?;
    Ok(Json(DataResponse { data: leads }))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(DataResponse { data: lead }))
}

/// PUT /api/v1/leads/{id}
///
/// Update a lead's pipeline status. Staff only.
pub async fn update(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = input.status {
        if !LEAD_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid lead status '{status}'. Must be one of: {}",
                LEAD_STATUSES.join(", ")
            ))));
        }
    }

    let lead = LeadRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;

    tracing::info!(
        lead_id = id,
        status = %lead.status,
        user_id = staff.user_id,
        "Lead status updated"
    );
    Ok(Json(DataResponse { data: lead }))
}

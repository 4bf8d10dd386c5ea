//! Translation request entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A translation request row from the `translation_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TranslationRequest {
    pub id: DbId,
    pub article_id: DbId,
    pub source_locale: String,
    pub target_locale: String,
    pub status: String,
    pub assignee_id: Option<DbId>,
    pub requested_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new translation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTranslationRequest {
    pub article_id: DbId,
    pub source_locale: String,
    pub target_locale: String,
}

/// Request body for assigning a translation request to a user.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignTranslationRequest {
    pub assignee_id: DbId,
}

/// Request body for a translation request status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTranslationRequestStatus {
    pub status: String,
}

//! Asset metadata entity model and DTOs.
//!
//! Only metadata is modeled; `storage_key` references the external store
//! and no file bytes pass through this layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// An asset row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub company_id: DbId,
    pub project_id: Option<DbId>,
    pub file_name: String,
    pub kind: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Valid asset kind values.
pub const ASSET_KINDS: &[&str] = &["image", "audio", "video", "model", "document"];

/// DTO for registering a new asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub company_id: DbId,
    pub project_id: Option<DbId>,
    pub file_name: String,
    pub kind: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
}

/// DTO for updating asset metadata. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAsset {
    pub file_name: Option<String>,
    pub project_id: Option<DbId>,
}

//! Asset collection entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A collection row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollection {
    pub company_id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing collection. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request body for adding an asset to a collection.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCollectionAsset {
    pub asset_id: DbId,
}

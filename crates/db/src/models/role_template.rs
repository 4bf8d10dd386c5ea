//! Role template entity model and DTOs.
//!
//! A role template overrides the hardcoded default permission set for a
//! role. At most one template exists per role.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A role template row from the `role_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleTemplate {
    pub id: DbId,
    pub role: String,
    pub permissions: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a role template.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRoleTemplate {
    pub permissions: Vec<String>,
}

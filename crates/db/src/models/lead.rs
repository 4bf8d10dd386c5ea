//! Lead entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A lead row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub message: String,
    pub source: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Valid lead status values.
pub const LEAD_STATUSES: &[&str] = &["new", "contacted", "qualified", "closed"];

/// DTO for capturing a new lead. Arrives from the public form endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

/// DTO for updating a lead's pipeline status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLead {
    pub status: Option<String>,
}

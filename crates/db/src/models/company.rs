//! Company (tenant) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A company row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A company membership row joined with the member's user summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyMember {
    pub id: DbId,
    pub company_id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub contact_email: Option<String>,
    pub website: Option<String>,
}

/// DTO for updating an existing company. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
}

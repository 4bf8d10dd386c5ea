//! Meeting entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A meeting row from the `meetings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Meeting {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub scheduled_at: Timestamp,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new meeting.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeeting {
    pub title: String,
    pub scheduled_at: Timestamp,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing meeting. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMeeting {
    pub title: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

//! Milestone entity models and DTOs for the approval workflow.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

use crate::models::task::Task;
use crate::models::user::UserSummary;

/// A milestone row from the `milestones` table.
///
/// `version` is the optimistic concurrency token: every workflow mutation
/// (sign-off, approve, reject) checks it and increments it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub due_date: Option<chrono::NaiveDate>,
    pub deliverables: Vec<String>,
    pub status: String,
    pub sign_off_by: Option<DbId>,
    pub sign_off_at: Option<Timestamp>,
    pub client_approval: Option<bool>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub feedback: Option<String>,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A milestone enriched with derived task progress for list/detail views.
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneWithProgress {
    #[serde(flatten)]
    pub milestone: Milestone,
    /// `completed_tasks / total_tasks` as a whole percentage; never stored.
    pub progress_pct: u8,
    pub total_tasks: i64,
    pub completed_tasks: i64,
}

/// A pending-approval entry: the milestone plus its tasks and the sign-off
/// user summary for display.
#[derive(Debug, Clone, Serialize)]
pub struct PendingApproval {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub tasks: Vec<Task>,
    pub signed_off_by: Option<UserSummary>,
}

/// DTO for creating a new milestone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMilestone {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub due_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// DTO for updating a milestone's descriptive fields. Status is never
/// updated through this path; workflow transitions own it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMilestone {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub due_date: Option<chrono::NaiveDate>,
    pub deliverables: Option<Vec<String>>,
}

/// Request body for the sign-off transition.
#[derive(Debug, Clone, Deserialize)]
pub struct SignOffRequest {
    /// The milestone version the caller last read.
    pub version: i32,
}

/// Request body for the client approve/reject decision.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
    pub feedback: Option<String>,
    /// The milestone version the caller last read.
    pub version: i32,
}

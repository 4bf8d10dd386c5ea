//! Notification entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use atelier_core::types::{DbId, Timestamp};

/// A notification row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub notif_type: String,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub project_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for queueing a new notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub notif_type: String,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub project_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
}

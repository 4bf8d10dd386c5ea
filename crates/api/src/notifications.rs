//! Best-effort notification queueing.
//!
//! Notifications are a side effect of workflow mutations and must never
//! fail the mutation that triggered them: a failed insert is logged at
//! `warn` and dropped. Every queued notification also publishes a
//! [`PlatformEvent`] so the persistence task captures it in the event log.

use atelier_db::models::notification::CreateNotification;
use atelier_db::repositories::NotificationRepo;
use atelier_events::PlatformEvent;

use crate::state::AppState;

/// Queue one notification for a user. Best-effort: errors are logged, not
/// returned.
pub async fn queue_notification(state: &AppState, input: CreateNotification) {
    let user_id = input.user_id;
    match NotificationRepo::create(&state.pool, &input).await {
        Ok(notification_id) => {
            let event = PlatformEvent::new("notification.queued")
                .with_source("notification", notification_id)
                .with_payload(serde_json::json!({
                    "notif_type": &input.notif_type,
                    "user_id": user_id,
                    "project_id": input.project_id,
                    "milestone_id": input.milestone_id,
                }));
            state.event_bus.publish(event);
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                user_id,
                notif_type = %input.notif_type,
                "Failed to queue notification"
            );
        }
    }
}

/// Queue the same notification for a list of users.
pub async fn queue_for_users(state: &AppState, user_ids: &[i64], template: &CreateNotification) {
    for &user_id in user_ids {
        queue_notification(
            state,
            CreateNotification {
                user_id,
                ..template.clone()
            },
        )
        .await;
    }
}

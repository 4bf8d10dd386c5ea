//! Route definitions for the caller's notifications.
//!
//! ```text
//! GET    /                 list (?unread_only, limit, offset)
//! GET    /unread-count     unread count
//! POST   /{id}/read        mark one read
//! POST   /read-all         mark all read
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list))
        .route("/unread-count", get(notification::unread_count))
        .route("/{id}/read", post(notification::mark_read))
        .route("/read-all", post(notification::mark_all_read))
}

//! Route definitions for lead capture and pipeline management.
//!
//! ```text
//! POST   /           public capture (no auth)
//! GET    /           list (staff, ?status=)
//! GET    /{id}       get (staff)
//! PUT    /{id}       update status (staff)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::lead;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lead::list).post(lead::capture))
        .route("/{id}", get(lead::get_by_id).put(lead::update))
}

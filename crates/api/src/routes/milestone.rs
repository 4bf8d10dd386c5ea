//! Route definitions for the milestone approval workflow.
//!
//! Milestone creation and listing live under `/projects/{project_id}`;
//! these routes cover individual milestones and the workflow actions.
//!
//! ```text
//! GET    /pending-approvals    milestones awaiting client decision
//! GET    /{id}                 milestone with derived task progress
//! PUT    /{id}                 update descriptive fields
//! DELETE /{id}                 hard delete (admin only)
//! POST   /{id}/sign-off        internal sign-off -> in_review
//! POST   /{id}/approval        client approve/reject decision
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::milestone;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending-approvals", get(milestone::pending_approvals))
        .route(
            "/{id}",
            get(milestone::get_by_id)
                .put(milestone::update)
                .delete(milestone::delete),
        )
        .route("/{id}/sign-off", post(milestone::sign_off))
        .route("/{id}/approval", post(milestone::decide))
}

//! Route definitions for projects and their nested tasks and meetings.
//!
//! ```text
//! /projects                           list, create
//! /projects/{id}                      get, update, delete
//! /projects/{project_id}/milestones   list, create (see milestone routes)
//! /projects/{project_id}/tasks        list, create
//! /projects/{project_id}/meetings     list, create
//!
//! /tasks/{id}                         get, update, delete
//! /meetings/{id}                      get, update, delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::{meeting, milestone, project, task};
use crate::state::AppState;

/// `/projects` routes, including nested per-project resources.
pub fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{project_id}/milestones",
            get(milestone::list_for_project).post(milestone::create),
        )
        .route(
            "/{project_id}/tasks",
            get(task::list_for_project).post(task::create),
        )
        .route(
            "/{project_id}/meetings",
            get(meeting::list_for_project).post(meeting::create),
        )
}

/// `/tasks` routes for individual task access.
pub fn tasks_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(task::get_by_id).put(task::update).delete(task::delete),
    )
}

/// `/meetings` routes for individual meeting access.
pub fn meetings_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(meeting::get_by_id)
            .put(meeting::update)
            .delete(meeting::delete),
    )
}

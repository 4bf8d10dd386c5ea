//! Route tree assembly.

pub mod admin;
pub mod article;
pub mod asset;
pub mod auth;
pub mod health;
pub mod lead;
pub mod milestone;
pub mod notification;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update
/// /admin/users/{id}/permissions                    replace additional permissions
/// /admin/users/{id}/download-access                toggle download access
/// /admin/users/{id}/effective-permissions          resolved permission set
/// /admin/companies                                 list, create
/// /admin/companies/{id}                            get, update, delete
/// /admin/companies/{id}/members                    list, add
/// /admin/companies/{id}/members/{user_id}          remove
/// /admin/role-templates                            list
/// /admin/role-templates/{role}                     upsert, delete
/// /admin/audit-logs                                filtered query
/// /admin/audit-logs/integrity-check                hash chain verification
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{project_id}/milestones                list, create
/// /projects/{project_id}/tasks                     list, create
/// /projects/{project_id}/meetings                  list, create
///
/// /milestones/pending-approvals                    milestones awaiting decision
/// /milestones/{id}                                 get, update, delete
/// /milestones/{id}/sign-off                        sign off for review (POST)
/// /milestones/{id}/approval                        approve/reject (POST)
///
/// /tasks/{id}                                      get, update, delete
/// /meetings/{id}                                   get, update, delete
///
/// /articles                                        list, create (staff)
/// /articles/by-slug/{slug}                         public resolved read
/// /articles/{id}                                   get, update, delete
/// /articles/{id}/translations                      list
/// /articles/{id}/translations/{locale}             upsert, delete
/// /translation-requests                            list, create
/// /translation-requests/{id}                       get
/// /translation-requests/{id}/assign                assign (POST)
/// /translation-requests/{id}/status                transition (PUT)
///
/// /assets                                          list, create
/// /assets/{id}                                     get, update, delete
/// /collections                                     list, create
/// /collections/{id}                                get, update, delete
/// /collections/{id}/assets                         list, add
/// /collections/{id}/assets/{asset_id}              remove
///
/// /leads                                           capture (public POST), list
/// /leads/{id}                                      get, update status
///
/// /notifications                                   list (?unread_only, limit, offset)
/// /notifications/unread-count                      unread count
/// /notifications/{id}/read                         mark read (POST)
/// /notifications/read-all                          mark all read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/projects", project::projects_router())
        .nest("/milestones", milestone::router())
        .nest("/tasks", project::tasks_router())
        .nest("/meetings", project::meetings_router())
        .nest("/articles", article::articles_router())
        .nest(
            "/translation-requests",
            article::translation_requests_router(),
        )
        .nest("/assets", asset::assets_router())
        .nest("/collections", asset::collections_router())
        .nest("/leads", lead::router())
        .nest("/notifications", notification::router())
}

//! Route definitions for the admin surface: user management, companies,
//! role templates, and audit reporting. Every handler here enforces the
//! admin role via the `RequireAdmin` extractor.
//!
//! ```text
//! /users                          list, create
//! /users/{id}                     get, update
//! /users/{id}/permissions         replace additional permissions (PUT)
//! /users/{id}/download-access     toggle download access (PUT)
//! /users/{id}/effective-permissions  resolved permission set (GET)
//!
//! /companies                      list, create
//! /companies/{id}                 get, update, delete
//! /companies/{id}/members         list, add
//! /companies/{id}/members/{user_id}  remove
//!
//! /role-templates                 list
//! /role-templates/{role}          upsert (PUT), delete
//!
//! /audit-logs                     filtered query (GET)
//! /audit-logs/integrity-check     hash chain verification (GET)
//! ```

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{audit, company, role_template, users};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", get(users::get_by_id).put(users::update))
        .route("/users/{id}/permissions", put(users::set_permissions))
        .route(
            "/users/{id}/download-access",
            put(users::set_download_access),
        )
        .route(
            "/users/{id}/effective-permissions",
            get(users::effective_permissions),
        )
        // Companies
        .route("/companies", get(company::list).post(company::create))
        .route(
            "/companies/{id}",
            get(company::get_by_id)
                .put(company::update)
                .delete(company::delete),
        )
        .route(
            "/companies/{id}/members",
            get(company::list_members).post(company::add_member),
        )
        .route(
            "/companies/{id}/members/{user_id}",
            delete(company::remove_member),
        )
        // Role templates
        .route("/role-templates", get(role_template::list))
        .route(
            "/role-templates/{role}",
            put(role_template::upsert).delete(role_template::delete),
        )
        // Audit logs
        .route("/audit-logs", get(audit::query_audit_logs))
        .route("/audit-logs/integrity-check", get(audit::check_integrity))
}

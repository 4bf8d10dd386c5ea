//! HTTP-level integration tests for login, token refresh, logout, and
//! RBAC enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json, post_json_auth, token_for};
use sqlx::PgPool;

/// Log in a user via the API and return the `data` payload containing
/// `access_token`, `refresh_token`, and `user` info.
async fn login(pool: &PgPool, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_user(&pool, "alice@atelier.test", "moderator").await;

    let data = login(&pool, "alice@atelier.test", "test_password_123!").await;
    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert_eq!(data["user"]["id"], user.id);
    assert_eq!(data["user"]["role"], "moderator");
    // The password hash must never appear in responses.
    assert!(data["user"]["password_hash"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    create_user(&pool, "alice@atelier.test", "moderator").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "alice@atelier.test", "password": "nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_unknown_email_is_401(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@atelier.test", "password": "whatever" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Refresh rotation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_user(&pool, "alice@atelier.test", "moderator").await;
    let data = login(&pool, "alice@atelier.test", "test_password_123!").await;
    let refresh_token = data["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await["data"].clone();
    assert!(refreshed["access_token"].is_string());
    assert_ne!(refreshed["refresh_token"], refresh_token);

    // The old refresh token is single-use.
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_refresh_token(pool: PgPool) {
    create_user(&pool, "alice@atelier.test", "moderator").await;
    let data = login(&pool, "alice@atelier.test", "test_password_123!").await;
    let access_token = data["access_token"].as_str().unwrap().to_string();
    let refresh_token = data["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        serde_json::json!({ "refresh_token": refresh_token }),
        &access_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Extractor enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_route_forbidden_for_staff(pool: PgPool) {
    let staff = create_user(&pool, "staff@atelier.test", "content_creator").await;
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        &token_for(&staff),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_route_forbidden_for_client(pool: PgPool) {
    let client = create_user(&pool, "client@atelier.test", "client").await;
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/articles",
        &token_for(&client),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

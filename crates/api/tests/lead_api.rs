//! HTTP-level integration tests for public lead capture and staff lead
//! management.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json, put_json_auth, token_for};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_capture_lead_without_auth(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/leads",
        serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "We need a new brand site.",
            "source": "contact-form",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "new");
    assert_eq!(json["data"]["email"], "dana@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_capture_rejects_bad_email(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/leads",
        serde_json::json!({
            "name": "Dana",
            "email": "not-an-email",
            "message": "Hello",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_capture_rejects_empty_message(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/leads",
        serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_listing_requires_staff(pool: PgPool) {
    let client = create_user(&pool, "client@atelier.test", "client").await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/leads",
        &token_for(&client),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_lists_and_updates_lead(pool: PgPool) {
    let staff = create_user(&pool, "sales@atelier.test", "moderator").await;
    let token = token_for(&staff);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/leads",
        serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "We need a new brand site.",
        }),
    )
    .await;
    let lead_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/leads?status=new",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/leads/{lead_id}"),
        serde_json::json!({ "status": "qualified" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "qualified");

    // The 'new' filter no longer matches.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/leads?status=new",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_lead_status_is_rejected(pool: PgPool) {
    let staff = create_user(&pool, "sales@atelier.test", "moderator").await;
    let token = token_for(&staff);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/leads",
        serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "Hi",
        }),
    )
    .await;
    let lead_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/leads/{lead_id}"),
        serde_json::json!({ "status": "won" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

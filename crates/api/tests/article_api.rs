//! HTTP-level integration tests for articles, locale fallback resolution,
//! and the translation request workflow.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get, get_auth, post_json_auth, put_json_auth, token_for};
use sqlx::PgPool;

async fn staff_token(pool: &PgPool) -> String {
    let staff = create_user(pool, "editor@atelier.test", "content_creator").await;
    token_for(&staff)
}

/// Create an article and return its id.
async fn create_article(pool: &PgPool, token: &str, slug: &str) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/articles",
        serde_json::json!({ "slug": slug, "default_locale": "en" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Upsert a translation for the article.
async fn upsert_translation(
    pool: &PgPool,
    token: &str,
    article_id: i64,
    locale: &str,
    title: &str,
    status: &str,
) {
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/articles/{article_id}/translations/{locale}"),
        serde_json::json!({ "title": title, "body": "Body text.", "status": status }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Publish the article itself.
async fn publish_article(pool: &PgPool, token: &str, article_id: i64) {
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/articles/{article_id}"),
        serde_json::json!({ "status": "published" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Article CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_slug_is_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;

    for slug in ["", "Has Spaces", "UPPER", "-leading", "trailing-"] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/articles",
            serde_json::json!({ "slug": slug }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "slug: {slug:?}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_slug_is_conflict(pool: PgPool) {
    let token = staff_token(&pool).await;
    create_article(&pool, &token, "hello-world").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/articles",
        serde_json::json!({ "slug": "hello-world" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upsert_translation_replaces_existing(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;

    upsert_translation(&pool, &token, article_id, "en", "First title", "draft").await;
    upsert_translation(&pool, &token, article_id, "en", "Second title", "published").await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/articles/{article_id}/translations"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1, "upsert must not create a second row");
    assert_eq!(items[0]["title"], "Second title");
    assert_eq!(items[0]["status"], "published");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_locale_is_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/articles/{article_id}/translations/en_US"),
        serde_json::json!({ "title": "T", "body": "B" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Public read with locale fallback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unpublished_article_is_not_served(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hidden").await;
    upsert_translation(&pool, &token, article_id, "en", "Hidden", "published").await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/articles/by-slug/hidden",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_requested_locale_is_served_when_published(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;
    upsert_translation(&pool, &token, article_id, "en", "Hello", "published").await;
    upsert_translation(&pool, &token, article_id, "de", "Hallo", "published").await;
    publish_article(&pool, &token, article_id).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/articles/by-slug/hello-world?locale=de",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["resolved_locale"], "de");
    assert_eq!(json["data"]["translation"]["title"], "Hallo");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unpublished_translation_falls_back_to_default_locale(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;
    upsert_translation(&pool, &token, article_id, "en", "Hello", "published").await;
    upsert_translation(&pool, &token, article_id, "de", "Hallo", "draft").await;
    publish_article(&pool, &token, article_id).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/articles/by-slug/hello-world?locale=de",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["resolved_locale"], "en");
    assert_eq!(json["data"]["translation"]["title"], "Hello");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_no_published_translation_is_404(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;
    upsert_translation(&pool, &token, article_id, "en", "Hello", "draft").await;
    publish_article(&pool, &token, article_id).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/articles/by-slug/hello-world",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Translation requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_translation_request_workflow(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;
    let translator = create_user(&pool, "translator@atelier.test", "content_creator").await;

    // Create.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/translation-requests",
        serde_json::json!({
            "article_id": article_id,
            "source_locale": "en",
            "target_locale": "de",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let request_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["status"], "pending");

    // Assign; the assignee gets notified.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/translation-requests/{request_id}/assign"),
        serde_json::json!({ "assignee_id": translator.id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "assigned");

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications/unread-count",
        &token_for(&translator),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["unread"], 1);

    // Forward transitions.
    for status in ["in_progress", "completed"] {
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/translation-requests/{request_id}/status"),
            serde_json::json!({ "status": status }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], status);
    }

    // Completed is terminal.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/translation-requests/{request_id}/status"),
        serde_json::json!({ "status": "cancelled" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_translation_request_cannot_skip_states(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/translation-requests",
        serde_json::json!({
            "article_id": article_id,
            "source_locale": "en",
            "target_locale": "de",
        }),
        &token,
    )
    .await;
    let request_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/translation-requests/{request_id}/status"),
        serde_json::json!({ "status": "completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_same_source_and_target_locale_is_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;
    let article_id = create_article(&pool, &token, "hello-world").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/translation-requests",
        serde_json::json!({
            "article_id": article_id,
            "source_locale": "en",
            "target_locale": "en",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

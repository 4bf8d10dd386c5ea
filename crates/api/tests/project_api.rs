//! HTTP-level integration tests for company-scoped project access and
//! cascade deletion.

mod common;

use axum::http::StatusCode;
use common::{
    add_member, body_json, create_company, create_user, delete_auth, get_auth, post_json_auth,
    token_for,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_member_creates_project(pool: PgPool) {
    let company_id = create_company(&pool, "Acme").await;
    let staff = create_user(&pool, "staff@acme.test", "moderator").await;
    add_member(&pool, company_id, staff.id).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "company_id": company_id, "name": "Rebrand" }),
        &token_for(&staff),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["company_id"], company_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_member_staff_cannot_create_project(pool: PgPool) {
    let company_id = create_company(&pool, "Acme").await;
    let outsider = create_user(&pool, "other@studio.test", "moderator").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "company_id": company_id, "name": "Rebrand" }),
        &token_for(&outsider),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_listing_is_scoped_to_memberships(pool: PgPool) {
    let acme = create_company(&pool, "Acme").await;
    let zenco = create_company(&pool, "ZenCo").await;

    let acme_staff = create_user(&pool, "a@acme.test", "moderator").await;
    add_member(&pool, acme, acme_staff.id).await;
    let zenco_staff = create_user(&pool, "z@zenco.test", "moderator").await;
    add_member(&pool, zenco, zenco_staff.id).await;
    let admin = create_user(&pool, "admin@atelier.test", "admin").await;

    for (token, company_id, name) in [
        (token_for(&acme_staff), acme, "Acme Site"),
        (token_for(&zenco_staff), zenco, "ZenCo App"),
    ] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/projects",
            serde_json::json!({ "company_id": company_id, "name": name }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Members see only their company's projects.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        &token_for(&acme_staff),
    )
    .await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Acme Site");

    // Admins see everything.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        &token_for(&admin),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    // A user with no memberships sees an empty list.
    let loner = create_user(&pool, "loner@nowhere.test", "client").await;
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        &token_for(&loner),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_member_get_is_forbidden(pool: PgPool) {
    let company_id = create_company(&pool, "Acme").await;
    let staff = create_user(&pool, "staff@acme.test", "moderator").await;
    add_member(&pool, company_id, staff.id).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "company_id": company_id, "name": "Rebrand" }),
        &token_for(&staff),
    )
    .await;
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let outsider = create_user(&pool, "other@studio.test", "client").await;
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}"),
        &token_for(&outsider),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_is_admin_only_and_cascades(pool: PgPool) {
    let company_id = create_company(&pool, "Acme").await;
    let staff = create_user(&pool, "staff@acme.test", "moderator").await;
    add_member(&pool, company_id, staff.id).await;
    let admin = create_user(&pool, "admin@atelier.test", "admin").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "company_id": company_id, "name": "Rebrand" }),
        &token_for(&staff),
    )
    .await;
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/milestones"),
        serde_json::json!({ "name": "Design" }),
        &token_for(&staff),
    )
    .await;
    let milestone_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Staff cannot hard-delete.
    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}"),
        &token_for(&staff),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin deletion cascades to milestones.
    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}"),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}"),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The deletion itself is audited.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/audit-logs?action_type=entity_delete",
        &token_for(&admin),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["entity_type"], "project");
}

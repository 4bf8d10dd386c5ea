//! HTTP-level integration tests for the milestone approval workflow:
//! sign-off, client approve/reject, optimistic versioning, derived task
//! progress, and the pending-approvals query.

mod common;

use axum::http::StatusCode;
use common::{
    add_member, body_json, create_company, create_user, get_auth, post_json_auth, token_for,
};
use sqlx::PgPool;

/// Everything the workflow tests need: a company with a staff member and a
/// client, plus an admin outside the company.
struct Fixture {
    staff_token: String,
    client_token: String,
    client_id: i64,
    admin_token: String,
    project_id: i64,
}

async fn setup(pool: &PgPool) -> Fixture {
    let company_id = create_company(pool, "Acme Studio").await;

    let staff = create_user(pool, "staff@acme.test", "content_creator").await;
    add_member(pool, company_id, staff.id).await;
    let client = create_user(pool, "client@acme.test", "client").await;
    add_member(pool, company_id, client.id).await;
    let admin = create_user(pool, "admin@atelier.test", "admin").await;

    let staff_token = token_for(&staff);
    let client_token = token_for(&client);
    let admin_token = token_for(&admin);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "company_id": company_id, "name": "Website Relaunch" }),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    Fixture {
        staff_token,
        client_token,
        client_id: client.id,
        admin_token,
        project_id,
    }
}

/// Create a milestone under the fixture project, returning its id.
async fn create_milestone(pool: &PgPool, fx: &Fixture, name: &str) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}/milestones", fx.project_id),
        serde_json::json!({
            "name": name,
            "deliverables": ["wireframes", "copy deck"],
            "due_date": "2026-09-01",
        }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Task progress derivation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_progress_is_derived_on_read(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    for (title, status) in [("Wireframes", "completed"), ("Copy", "not_started")] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{}/tasks", fx.project_id),
            serde_json::json!({
                "title": title,
                "status": status,
                "milestone_id": milestone_id,
            }),
            &fx.staff_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}"),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress_pct"], 50);
    assert_eq!(json["data"]["total_tasks"], 2);
    assert_eq!(json["data"]["completed_tasks"], 1);
}

// ---------------------------------------------------------------------------
// Sign-off
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_off_moves_to_in_review(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_review");
    assert!(json["data"]["sign_off_by"].is_number());
    assert!(json["data"]["sign_off_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_off_forbidden_for_outside_staff(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    // Staff of a different company: correct role, no membership.
    let outsider = create_user(&pool, "other@studio.test", "moderator").await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &token_for(&outsider),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");

    // State must be unchanged.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}"),
        &fx.admin_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "planned");
    assert!(json["data"]["sign_off_by"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_client_cannot_sign_off(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_off_twice_is_rejected(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Already in review: the transition is illegal regardless of version.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 1 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_off_notifies_company_clients(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications?unread_only=true",
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["notif_type"], "milestone.awaiting_approval");
    assert_eq!(items[0]["milestone_id"], milestone_id);
}

// ---------------------------------------------------------------------------
// Approve / Reject
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decision_requires_in_review_status(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/approval"),
        serde_json::json!({ "approved": true, "version": 0 }),
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_approval_on_missing_milestone_is_404(pool: PgPool) {
    let fx = setup(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/milestones/999999/approval",
        serde_json::json!({ "approved": true, "version": 0 }),
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_stale_version_is_rejected_with_conflict(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The sign-off bumped the version to 1; deciding against version 0
    // must fail without writing anything.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/approval"),
        serde_json::json!({ "approved": true, "version": 0 }),
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}"),
        &fx.client_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_review");
    assert!(json["data"]["client_approval"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_cannot_decide(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/approval"),
        serde_json::json!({ "approved": true, "version": 1 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The end-to-end scenario: 50% progress, sign-off, rejection with
/// feedback, re-sign-off, approval.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_full_approval_workflow(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;

    for (title, status) in [("Wireframes", "completed"), ("Copy", "not_started")] {
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{}/tasks", fx.project_id),
            serde_json::json!({
                "title": title,
                "status": status,
                "milestone_id": milestone_id,
            }),
            &fx.staff_token,
        )
        .await;
    }

    // 2 tasks, 1 completed: 50%.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}"),
        &fx.staff_token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["progress_pct"], 50);

    // Sign off.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "in_review");

    // Reject with feedback.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/approval"),
        serde_json::json!({
            "approved": false,
            "feedback": "needs more detail",
            "version": 1,
        }),
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["client_approval"], false);
    assert!(json["data"]["approved_by"].is_null());
    assert!(json["data"]["approved_at"].is_null());
    // A fresh sign-off is required, so the old one is cleared.
    assert!(json["data"]["sign_off_by"].is_null());
    assert_eq!(json["data"]["feedback"], "needs more detail");

    // Sign off again.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 2 }),
        &fx.staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "in_review");

    // Approve.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/approval"),
        serde_json::json!({ "approved": true, "version": 3 }),
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["client_approval"], true);
    assert_eq!(json["data"]["approved_by"], fx.client_id);
    assert!(json["data"]["approved_at"].is_string());

    // The internal team was notified of the decision.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications",
        &fx.staff_token,
    )
    .await;
    let json = body_json(response).await;
    let types: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["notif_type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"milestone.decision"));
}

// ---------------------------------------------------------------------------
// Pending approvals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_pending_approvals_empty_without_memberships(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;

    // A client with no company memberships sees nothing.
    let loner = create_user(&pool, "loner@nowhere.test", "client").await;
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/milestones/pending-approvals",
        &token_for(&loner),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_pending_approvals_ordering_and_enrichment(pool: PgPool) {
    let fx = setup(&pool).await;

    // Two milestones in review with different due dates; the one due
    // sooner must come first.
    let later = create_milestone(&pool, &fx, "Launch").await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}/milestones", fx.project_id),
        serde_json::json!({ "name": "Kickoff", "due_date": "2026-08-15" }),
        &fx.staff_token,
    )
    .await;
    let sooner = body_json(response).await["data"]["id"].as_i64().unwrap();

    for id in [later, sooner] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/milestones/{id}/sign-off"),
            serde_json::json!({ "version": 0 }),
            &fx.staff_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/milestones/pending-approvals",
        &fx.client_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], sooner);
    assert_eq!(items[1]["id"], later);
    // Each entry carries its tasks and the sign-off user summary.
    assert!(items[0]["tasks"].is_array());
    assert_eq!(items[0]["signed_off_by"]["email"], "staff@acme.test");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_pending_approvals_admin_sees_all_companies(pool: PgPool) {
    let fx = setup(&pool).await;
    let milestone_id = create_milestone(&pool, &fx, "Design").await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/milestones/{milestone_id}/sign-off"),
        serde_json::json!({ "version": 0 }),
        &fx.staff_token,
    )
    .await;

    // The admin belongs to no company but still sees the milestone.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/milestones/pending-approvals",
        &fx.admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Filtered to an unrelated project id: empty.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/milestones/pending-approvals?project_id=999999",
        &fx.admin_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

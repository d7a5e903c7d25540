//! HTTP-level integration tests for join requests and approval.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, project_body};
use serde_json::json;
use sqlx::PgPool;

struct Fixture {
    project_id: i64,
    owner_token: String,
    member_token: String,
}

/// A project owned by `owner` and a second, unrelated user.
async fn setup(pool: &PgPool, active: bool) -> Fixture {
    let (owner, owner_token) = common::create_user(pool, "owner", false).await;
    let (_, member_token) = common::create_user(pool, "member", false).await;

    let mut body = project_body("P-001", owner.id, owner.id);
    body["is_active"] = json!(active);
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/projects", body, &owner_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    Fixture {
        project_id,
        owner_token,
        member_token,
    }
}

async fn join(pool: &PgPool, token: &str, project_id: i64, role: &str) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/projects/join",
        json!({ "project_id": project_id, "role": role, "note": "  Field sampling  " }),
        token,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn milestone_status(pool: &PgPool, token: &str, project_id: i64) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/milestones"),
        json!({ "title": "Sampling round" }),
        token,
    )
    .await
    .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn join_creates_pending_membership(pool: PgPool) {
    let fx = setup(&pool, true).await;

    let (status, json) = join(&pool, &fx.member_token, fx.project_id, "CO").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["is_active"], false);
    assert_eq!(json["role"], "CO");
    assert_eq!(json["note"], "Field sampling");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_join_returns_existing_membership(pool: PgPool) {
    let fx = setup(&pool, true).await;
    let (_, first) = join(&pool, &fx.member_token, fx.project_id, "CO").await;

    let (status, second) = join(&pool, &fx.member_token, fx.project_id, "PS").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["role"], "CO");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn joining_inactive_project_is_rejected(pool: PgPool) {
    let fx = setup(&pool, false).await;

    let (status, json) = join(&pool, &fx.member_token, fx.project_id, "CO").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["project_id"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn joining_missing_project_returns_404(pool: PgPool) {
    let fx = setup(&pool, true).await;

    let (status, _) = join(&pool, &fx.member_token, 999_999, "CO").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_member_reads_but_cannot_write_until_approved(pool: PgPool) {
    let fx = setup(&pool, true).await;
    let (_, membership) = join(&pool, &fx.member_token, fx.project_id, "CO").await;
    let membership_id = membership["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{}", fx.project_id),
        &fx.member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        milestone_status(&pool, &fx.member_token, fx.project_id).await,
        StatusCode::FORBIDDEN
    );

    // A pending member cannot approve themselves.
    let approve_uri = format!(
        "/api/v1/projects/{}/members/{membership_id}/approve",
        fx.project_id
    );
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &approve_uri, json!({}), &fx.member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &approve_uri, json!({}), &fx.owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_active"], true);

    assert_eq!(
        milestone_status(&pool, &fx.member_token, fx.project_id).await,
        StatusCode::CREATED
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approving_membership_of_another_project_returns_404(pool: PgPool) {
    let fx = setup(&pool, true).await;
    let (other, other_token) = common::create_user(&pool, "other", false).await;
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/projects",
        project_body("P-002", other.id, other.id),
        &other_token,
    )
    .await;
    let other_project = body_json(response).await["id"].as_i64().unwrap();
    let (_, membership) = join(&pool, &fx.member_token, other_project, "CO").await;
    let membership_id = membership["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!(
            "/api/v1/projects/{}/members/{membership_id}/approve",
            fx.project_id
        ),
        json!({}),
        &fx.owner_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn members_list_includes_usernames(pool: PgPool) {
    let fx = setup(&pool, true).await;
    join(&pool, &fx.member_token, fx.project_id, "CO").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{}/members", fx.project_id),
        &fx.owner_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let usernames: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&"owner"));
    assert!(usernames.contains(&"member"));
}

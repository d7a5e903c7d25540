//! HTTP-level integration tests for change logs and expenses.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, project_body};
use serde_json::json;
use sqlx::PgPool;

/// Create a user owning one project. Returns `(token, project_id)`.
async fn project_owner(pool: &PgPool) -> (String, i64) {
    let (user, token) = common::create_user(pool, "pi", false).await;
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/projects",
        project_body("P-001", user.id, user.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["id"].as_i64().unwrap();
    (token, project_id)
}

async fn post(
    pool: &PgPool,
    token: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, uri, body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Change logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn changelog_defaults_to_draft(pool: PgPool) {
    let (token, project_id) = project_owner(&pool).await;

    let (status, json) = post(
        &pool,
        &token,
        &format!("/api/v1/projects/{project_id}/changelogs"),
        json!({ "title": "Budget shift", "description": "Moved funds to equipment." }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "draft");
    assert_eq!(json["project_id"], project_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn changelog_requires_title_and_description(pool: PgPool) {
    let (token, project_id) = project_owner(&pool).await;

    let (status, json) = post(
        &pool,
        &token,
        &format!("/api/v1/projects/{project_id}/changelogs"),
        json!({ "title": " ", "description": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["title"].is_array());
    assert!(json["fields"]["description"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn changelogs_appear_in_project_and_personal_lists(pool: PgPool) {
    let (token, project_id) = project_owner(&pool).await;
    let uri = format!("/api/v1/projects/{project_id}/changelogs");
    for title in ["First change", "Second change"] {
        let (status, _) = post(
            &pool,
            &token,
            &uri,
            json!({ "title": title, "description": "Details.", "status": "pending" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/me/changelogs", &token).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["project_title"], "Soil microbiome survey");
    assert_eq!(data[0]["status"], "pending");
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn expense_list_reports_total_and_budget(pool: PgPool) {
    let (token, project_id) = project_owner(&pool).await;
    let uri = format!("/api/v1/projects/{project_id}/expenses");
    for (amount, date) in [("10.50", "2025-03-01"), ("20.25", "2025-03-15")] {
        let (status, _) = post(
            &pool,
            &token,
            &uri,
            json!({ "description": "Reagents", "amount": amount, "expense_date": date }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], "30.75");
    assert_eq!(json["data"]["budget_total"], "150000.00");
    let expenses = json["data"]["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["expense_date"], "2025-03-15");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expense_without_entries_totals_zero(pool: PgPool) {
    let (token, project_id) = project_owner(&pool).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/projects/{project_id}/expenses"), &token).await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], "0.00");
    assert!(json["data"]["expenses"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expense_amount_must_be_non_negative_with_two_decimals(pool: PgPool) {
    let (token, project_id) = project_owner(&pool).await;
    let uri = format!("/api/v1/projects/{project_id}/expenses");

    for amount in ["1.005", "-5.00"] {
        let (status, json) = post(
            &pool,
            &token,
            &uri,
            json!({ "description": "Reagents", "amount": amount, "expense_date": "2025-03-01" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
        assert!(json["fields"]["amount"].is_array());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn outsider_cannot_record_expense(pool: PgPool) {
    let (_, project_id) = project_owner(&pool).await;
    let (_, outsider_token) = common::create_user(&pool, "outsider", false).await;

    let (status, json) = post(
        &pool,
        &outsider_token,
        &format!("/api/v1/projects/{project_id}/expenses"),
        json!({ "description": "Reagents", "amount": "1.00", "expense_date": "2025-03-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

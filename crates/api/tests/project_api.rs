//! HTTP-level integration tests for project CRUD and the project form rules.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, project_body, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

/// Create a project through the API and return its JSON.
async fn create_project(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// POST an invalid body and return the `fields` map of the 400 response.
async fn rejected_fields(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    json["fields"].clone()
}

fn field_names(fields: &serde_json::Value) -> Vec<&str> {
    let mut names: Vec<&str> = fields
        .as_object()
        .expect("fields should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    names
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_enrolls_pi_and_steward(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (steward, _) = common::create_user(&pool, "steward", false).await;

    let json = create_project(&pool, &token, project_body("P-001", pi.id, steward.id)).await;

    assert_eq!(json["internal_number"], "P-001");
    assert_eq!(json["budget_total"], "150000.00");
    assert_eq!(json["is_active"], true);
    assert_eq!(json["display_name"], "Project: Soil microbiome survey (P-001)");
    assert!(json["status"].is_string());
    assert!(json["status_label"].is_string());

    let id = json["id"].as_i64().unwrap();
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/projects/{id}/members"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let members = body_json(response).await;
    let roles: Vec<&str> = members["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles.len(), 2);
    assert!(roles.contains(&"PI"));
    assert!(roles.contains(&"PS"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_person_without_email_reports_only_contact_email(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let mut body = project_body("P-001", pi.id, pi.id);
    body["contact_person"] = json!("Jan Kowalski");
    body["contact_phone"] = json!("+48 600 700 800");
    // Would also break the start/end rule; the contact rule reports alone.
    body["start_date"] = json!("2027-01-01");

    let fields = rejected_fields(&pool, &token, body).await;

    assert_eq!(field_names(&fields), vec!["contact_email"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn multi_party_project_requires_leader_and_partners(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let mut body = project_body("P-001", pi.id, pi.id);
    body["project_type"] = json!("GR");

    let fields = rejected_fields(&pool, &token, body).await;

    assert_eq!(
        field_names(&fields),
        vec!["domestic_partners", "foreign_partners", "project_leader"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn multi_party_project_with_foreign_partner_is_accepted(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let mut body = project_body("P-001", pi.id, pi.id);
    body["project_type"] = json!("GR");
    body["project_leader"] = json!("University of Warsaw");
    body["foreign_partners"] = json!("ETH Zurich");

    let json = create_project(&pool, &token, body).await;
    assert_eq!(json["project_type"], "GR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn funding_decision_after_agreement_reports_both_dates(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let mut body = project_body("P-001", pi.id, pi.id);
    body["funding_decision_date"] = json!("2025-01-20");
    body["agreement_sign_date"] = json!("2025-01-10");

    let fields = rejected_fields(&pool, &token, body).await;

    assert_eq!(
        field_names(&fields),
        vec!["agreement_sign_date", "funding_decision_date"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_after_end_reports_both_dates(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let mut body = project_body("P-001", pi.id, pi.id);
    body["end_date"] = json!("2025-01-31");

    let fields = rejected_fields(&pool, &token, body).await;

    assert_eq!(field_names(&fields), vec!["end_date", "start_date"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_required_fields_are_reported_per_field(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "pi", false).await;

    let fields = rejected_fields(&pool, &token, json!({ "title": "Only a title" })).await;

    assert!(fields["internal_number"].is_array());
    assert!(fields["principal_investigator_id"].is_array());
    assert!(fields["budget_total"].is_array());
    assert!(fields.get("title").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn budget_with_three_decimals_is_rejected(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let mut body = project_body("P-001", pi.id, pi.id);
    body["budget_total"] = json!("100.125");

    let fields = rejected_fields(&pool, &token, body).await;

    assert_eq!(field_names(&fields), vec!["budget_total"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_principal_investigator_is_a_field_error(pool: PgPool) {
    let (steward, token) = common::create_user(&pool, "steward", false).await;

    let fields = rejected_fields(&pool, &token, project_body("P-001", 999_999, steward.id)).await;

    assert_eq!(field_names(&fields), vec!["principal_investigator_id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_internal_number_conflicts(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/projects",
        project_body("P-001", pi.id, pi.id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_project_includes_schedule_fields(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert!(!json["days_remaining"].is_null());
    assert!(json["milestones"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_member_cannot_read_project(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (_, outsider_token) = common::create_user(&pool, "outsider", false).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &outsider_token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn system_admin_can_read_any_project(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (_, admin_token) = common::create_user(&pool, "root", true).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &admin_token).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_project_returns_404(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "pi", false).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/projects/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_shows_only_my_projects(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (other, other_token) = common::create_user(&pool, "other", false).await;
    create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    create_project(&pool, &other_token, project_body("P-002", other.id, other.id)).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/projects", &token).await;
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["internal_number"], "P-001");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/projects/joinable", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Update and delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pi_can_update_project(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();

    let mut body = project_body("P-001", pi.id, pi.id);
    body["title"] = json!("  Renamed survey  ");
    let app = common::build_test_app(pool);
    let response = put_json_auth(app, &format!("/api/v1/projects/{id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Renamed survey");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reassigned_principal_investigator_gains_access(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (successor, successor_token) = common::create_user(&pool, "successor", false).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/projects/{id}"),
        project_body("P-001", successor.id, pi.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["principal_investigator_id"], successor.id);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/projects/{id}"), &successor_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/me/projects", &successor_token).await).await;
    let projects = json["data"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["role"], "PI");

    // The new principal investigator can edit the project in turn.
    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/projects/{id}"),
        project_body("P-001", successor.id, successor.id),
        &successor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn collaborator_cannot_update_project(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (_, collaborator_token) = common::create_user(&pool, "collab", false).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();

    // Join and get approved as a collaborator.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/projects/join",
        json!({ "project_id": id, "role": "CO" }),
        &collaborator_token,
    )
    .await;
    let membership_id = body_json(response).await["id"].as_i64().unwrap();
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{id}/members/{membership_id}/approve"),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/projects/{id}"),
        project_body("P-001", pi.id, pi.id),
        &collaborator_token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_system_admin_can_delete_project(pool: PgPool) {
    let (pi, token) = common::create_user(&pool, "pi", false).await;
    let (_, admin_token) = common::create_user(&pool, "root", true).await;
    let created = create_project(&pool, &token, project_body("P-001", pi.id, pi.id)).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/projects/{id}");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

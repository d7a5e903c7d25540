#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use labdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use labdesk_api::config::ServerConfig;
use labdesk_api::router::build_app_router;
use labdesk_api::state::AppState;
use labdesk_core::roles::{DEFAULT_ROLE_ID, ROLE_ADMIN, ROLE_USER};
use labdesk_db::models::user::{CreateUser, User};
use labdesk_db::repositories::UserRepo;

/// System role id of `admin` in the seeded `roles` table.
pub const ADMIN_ROLE_ID: i64 = 1;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        max_upload_bytes: 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, sharing the production middleware stack.
///
/// Uploaded files land in a directory under the system temp dir.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_media(pool, &std::env::temp_dir().join("labdesk-test-media"))
}

pub fn build_test_app_with_media(pool: PgPool, media_root: &Path) -> Router {
    let config = test_config(media_root);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user directly and mint a bearer token for them.
pub async fn create_user(pool: &PgPool, username: &str, admin: bool) -> (User, String) {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "unused".to_string(),
        first_name: String::new(),
        last_name: String::new(),
        role_id: if admin { ADMIN_ROLE_ID } else { DEFAULT_ROLE_ID },
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let role = if admin { ROLE_ADMIN } else { ROLE_USER };
    let token = generate_access_token(user.id, role, &test_config(&PathBuf::new()).jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// A consistent single-party project body referencing the given users.
pub fn project_body(internal_number: &str, pi_id: i64, steward_id: i64) -> serde_json::Value {
    serde_json::json!({
        "internal_number": internal_number,
        "title": "Soil microbiome survey",
        "description": "Sampling across three regions",
        "principal_investigator_id": pi_id,
        "pi_email": "pi@example.com",
        "pi_phone": "+48 123 456 789",
        "project_type": "IND",
        "funding_agency": "NCN",
        "call_name": "OPUS 25",
        "funding_decision_date": "2025-01-01",
        "funding_number": "2025/01/X/NZ1/00001",
        "agreement_number": "UMO-2025/01",
        "agreement_sign_date": "2025-01-15",
        "start_date": "2025-02-01",
        "end_date": "2026-02-01",
        "executing_unit": "Faculty of Biology",
        "budget_total": "150000.00",
        "project_support_id": steward_id,
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, json_request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request(Method::DELETE, uri, Some(token), None)).await
}

/// POST a multipart form. `file` is `(file name, contents)`.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
    token: &str,
) -> Response<Body> {
    let boundary = "labdesk-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

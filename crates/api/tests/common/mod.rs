#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use spark_api::auth::jwt::{generate_access_token, JwtConfig};
use spark_api::config::ServerConfig;
use spark_api::engine::JobEngine;
use spark_api::router::build_app_router;
use spark_api::state::AppState;
use spark_core::roles::{ROLE_ADMIN, ROLE_SELLER};
use spark_core::upload::DEFAULT_MAX_UPLOAD_BYTES;
use spark_pipeline::{SimulatedExecutor, StepDelays};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and the given upload dir.
pub fn test_config(upload_dir: &Path, step_delays: StepDelays) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        step_delays,
        admin: None,
    }
}

/// Full application plus handles the tests inspect directly.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// App whose jobs only move when the test calls `state.engine.advance`.
pub fn build_test_app() -> TestApp {
    build(false, StepDelays::none())
}

/// App that drives every submitted job in the background.
pub fn build_autostart_app(step_delays: StepDelays) -> TestApp {
    build(true, step_delays)
}

fn build(autostart: bool, step_delays: StepDelays) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("temp dir");
    let config = test_config(upload_dir.path(), step_delays);
    let pool = spark_db::create_pool();

    let executor = Arc::new(SimulatedExecutor::new(upload_dir.path(), step_delays));
    let engine = if autostart {
        JobEngine::new(pool.clone(), executor)
    } else {
        JobEngine::manual(pool.clone(), executor)
    };

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        upload_dir,
    }
}

pub fn seller_token(owner_id: &str) -> String {
    token(owner_id, ROLE_SELLER)
}

pub fn admin_token() -> String {
    token("admin-1", ROLE_ADMIN)
}

fn token(owner_id: &str, role: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
        refresh_token_expiry_days: 7,
    };
    generate_access_token(owner_id, role, &config).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should be handled")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a raw body, with an optional content type, as an authenticated caller.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
    token: &str,
) -> Response<Body> {
    let mut builder = Request::post(uri).header("authorization", format!("Bearer {token}"));
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Job helpers
// ---------------------------------------------------------------------------

/// Submit a job through the API and return its id.
pub async fn submit_job(app: &TestApp, token: &str, locator: &str) -> String {
    let response = post_json_auth(
        app.app(),
        "/api/v1/ai/jobs",
        serde_json::json!({ "resourceLocator": locator }),
        token,
    )
    .await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    json["data"]["jobId"]
        .as_str()
        .expect("jobId should be a string")
        .to_string()
}

/// Fetch a job's view through the API.
pub async fn job_view(app: &TestApp, token: &str, job_id: &str) -> serde_json::Value {
    let response = get_auth(app.app(), &format!("/api/v1/ai/jobs/{job_id}"), token).await;
    assert_eq!(response.status(), 200);
    let mut json = body_json(response).await;
    json["data"].take()
}

/// Advance a job through every remaining step.
pub async fn run_to_end(app: &TestApp, job_id: &str) {
    let id = job_id.parse().expect("job id should be a uuid");
    for _ in 0..spark_core::job::STEP_COUNT {
        app.state.engine.advance(id).await.expect("job exists");
    }
}

//! HTTP-level integration tests for seller registration and sessions.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, get_auth, post_auth, post_json, send, TestApp};
use serde_json::{json, Value};

async fn register(app: &TestApp, seller_id: &str, email: &str) -> StatusCode {
    let body = json!({
        "sellerName": "Asha Textiles",
        "sellerId": seller_id,
        "email": email,
        "password": "handloom-2024",
    });
    post_json(app.app(), "/api/v1/auth/register", body).await.status()
}

async fn login(app: &TestApp, login: &str, password: &str) -> (StatusCode, Value) {
    let body = json!({ "email": login, "password": password });
    let response = post_json(app.app(), "/api/v1/auth/login", body).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn register_then_login_by_email_or_seller_id() {
    let app = build_test_app();
    assert_eq!(register(&app, "asha-01", "asha@example.com").await, StatusCode::CREATED);

    let (status, json) = login(&app, "Asha@Example.com", "handloom-2024").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
    assert_eq!(json["expiresIn"], 3600);
    assert_eq!(json["user"]["sellerId"], "asha-01");
    assert_eq!(json["user"]["role"], "seller");
    assert_eq!(json["user"]["businessName"], "Asha Textiles's Store");
    assert!(json["user"].get("passwordHash").is_none());

    let (status, _) = login(&app, "asha-01", "handloom-2024").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = build_test_app();
    assert_eq!(register(&app, "asha-01", "asha@example.com").await, StatusCode::CREATED);
    assert_eq!(register(&app, "asha-01", "other@example.com").await, StatusCode::CONFLICT);
    assert_eq!(register(&app, "asha-02", "ASHA@example.com").await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn seller_id_cannot_shadow_another_sellers_email() {
    let app = build_test_app();
    assert_eq!(register(&app, "asha-01", "asha@example.com").await, StatusCode::CREATED);
    assert_eq!(register(&app, "asha@example.com", "imposter@example.com").await, StatusCode::CONFLICT);
    assert_eq!(register(&app, "ravi@example.com", "ravi-shop@example.com").await, StatusCode::CREATED);
    assert_eq!(register(&app, "ravi-02", "Ravi@Example.com").await, StatusCode::CONFLICT);

    let (status, json) = login(&app, "asha@example.com", "handloom-2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["sellerId"], "asha-01");
}

#[tokio::test]
async fn registered_names_are_trimmed() {
    let app = build_test_app();
    let body = json!({
        "sellerName": "  Asha Textiles ",
        "sellerId": " asha-01 ",
        "email": " asha@example.com ",
        "password": "handloom-2024",
    });
    let response = post_json(app.app(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["user"]["sellerId"], "asha-01");
    assert_eq!(json["user"]["sellerName"], "Asha Textiles");
}

#[tokio::test]
async fn non_json_auth_bodies_are_validation_errors() {
    let app = build_test_app();
    for uri in ["/api/v1/auth/register", "/api/v1/auth/login", "/api/v1/auth/refresh"] {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let response = send(app.app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response = post_json(app.app(), "/api/v1/auth/refresh", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_validates_fields() {
    let app = build_test_app();

    let cases = [
        json!({ "sellerName": "A", "sellerId": "a", "email": "a@example.com", "password": "short" }),
        json!({ "sellerName": "A", "sellerId": "a", "email": "not-an-email", "password": "long-enough" }),
        json!({ "sellerId": "a", "email": "a@example.com", "password": "long-enough" }),
        json!({ "sellerName": "A", "sellerId": "   ", "email": "a@example.com", "password": "long-enough" }),
        json!({ "sellerName": " \t", "sellerId": "a", "email": "a@example.com", "password": "long-enough" }),
        json!({ "sellerName": "A", "sellerId": 7, "email": "a@example.com", "password": "long-enough" }),
    ];
    for body in cases {
        let response = post_json(app.app(), "/api/v1/auth/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let app = build_test_app();
    register(&app, "asha-01", "asha@example.com").await;

    let (status, json) = login(&app, "asha@example.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, _) = login(&app, "nobody@example.com", "handloom-2024").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_token_owns_submitted_jobs() {
    let app = build_test_app();
    register(&app, "asha-01", "asha@example.com").await;
    let (_, json) = login(&app, "asha@example.com", "handloom-2024").await;
    let token = json["accessToken"].as_str().unwrap();

    let job_id = common::submit_job(&app, token, "img-1").await;
    let response = get_auth(app.app(), &format!("/api/v1/ai/jobs/{job_id}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let job = spark_db::repositories::JobRepo::find_by_id(&app.state.pool, job_id.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(job.owner_id, json["user"]["id"]);
}

#[tokio::test]
async fn refresh_rotates_the_session() {
    let app = build_test_app();
    register(&app, "asha-01", "asha@example.com").await;
    let (_, json) = login(&app, "asha@example.com", "handloom-2024").await;
    let old_refresh = json["refreshToken"].clone();

    let response = post_json(
        app.app(),
        "/api/v1/auth/refresh",
        json!({ "refreshToken": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refreshToken"], old_refresh);

    let response = post_json(
        app.app(),
        "/api/v1/auth/refresh",
        json!({ "refreshToken": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_refresh_tokens() {
    let app = build_test_app();
    register(&app, "asha-01", "asha@example.com").await;
    let (_, json) = login(&app, "asha@example.com", "handloom-2024").await;

    let response = post_auth(
        app.app(),
        "/api/v1/auth/logout",
        json["accessToken"].as_str().unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app.app(),
        "/api/v1/auth/refresh",
        json!({ "refreshToken": json["refreshToken"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

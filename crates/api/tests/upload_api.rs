//! HTTP-level integration tests for image uploads and jobs that use them.

mod common;

use std::io::Cursor;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, job_view, run_to_end, seller_token, send, submit_job};
use image::{DynamicImage, ImageFormat, RgbImage};

const BOUNDARY: &str = "spark-test-boundary";

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(8, 6))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
         filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::post("/api/v1/ai/uploads").header(
        "content-type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn uploaded_image_can_be_processed() {
    let app = build_test_app();
    let token = seller_token("seller-42");

    let body = multipart_body("file", "kurta.png", "image/png", &png_bytes());
    let response = send(app.app(), upload_request(Some(&token), body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    let filename = data["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert_eq!(data["url"], format!("/uploads/{filename}"));
    assert_eq!(data["contentType"], "image/png");
    assert!(data["uploadId"].is_string());
    assert!(app.upload_dir.path().join(filename).is_file());

    let job_id = submit_job(&app, &token, data["url"].as_str().unwrap()).await;
    run_to_end(&app, &job_id).await;

    let view = job_view(&app, &token, &job_id).await;
    assert_eq!(view["status"], "completed");
    assert_eq!(view["result"]["enhancedImageUrl"], data["url"]);
    assert_eq!(view["result"]["imageDimensions"]["width"], 8);
    assert_eq!(view["result"]["imageDimensions"]["height"], 6);
}

#[tokio::test]
async fn job_for_missing_upload_fails_at_upload_step() {
    let app = build_test_app();
    let token = seller_token("seller-42");

    let job_id = submit_job(&app, &token, "/uploads/never-uploaded.png").await;
    run_to_end(&app, &job_id).await;

    let view = job_view(&app, &token, &job_id).await;
    assert_eq!(view["status"], "failed");
    assert_eq!(view["progressPercent"], 0);
    assert!(view["error"]
        .as_str()
        .unwrap()
        .starts_with("Resource not found"));
    assert!(view.get("result").is_none());
}

#[tokio::test]
async fn non_images_are_rejected() {
    let app = build_test_app();
    let token = seller_token("seller-42");

    let body = multipart_body("file", "notes.pdf", "application/pdf", b"%PDF-1.4");
    let response = send(app.app(), upload_request(Some(&token), body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "File must be an image");
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = build_test_app();
    let token = seller_token("seller-42");

    let body = multipart_body("attachment", "kurta.png", "image/png", &png_bytes());
    let response = send(app.app(), upload_request(Some(&token), body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploads_require_authentication() {
    let app = build_test_app();

    let body = multipart_body("file", "kurta.png", "image/png", &png_bytes());
    let response = send(app.app(), upload_request(None, body)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

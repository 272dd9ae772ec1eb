//! HTTP tests for the upload server
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`,
//! with each test storing uploads in its own temporary directory.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;
use urine_colorscan::server::{router, AppState};
use urine_colorscan::AppConfig;

const BOUNDARY: &str = "----colorscan-test-boundary";

fn solid_png(color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(300, 300, Rgb(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn test_app() -> (Router, TempDir) {
    test_app_with(AppConfig::default())
}

fn test_app_with(mut config: AppConfig) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    config.storage.upload_dir = dir.path().join("uploads");
    (router(AppState::new(config)), dir)
}

fn stored_files(dir: &TempDir) -> Vec<String> {
    let uploads = dir.path().join("uploads");
    let Ok(entries) = std::fs::read_dir(&uploads) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

enum Part<'a> {
    File { name: &'a str, filename: &'a str, bytes: &'a [u8] },
    Text { name: &'a str, value: &'a str },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File { name, filename, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_index_serves_form() {
    let (app, _dir) = test_app();
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert!(html.contains("name=\"mode\""));
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app();
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

// ============================================================================
// Uploads
// ============================================================================

#[tokio::test]
async fn test_upload_valid_image() {
    let (app, dir) = test_app();
    let png = solid_png([220, 180, 80]);

    let response = app
        .oneshot(upload_request(&[
            Part::File { name: "image", filename: "sample.png", bytes: &png },
            Part::Text { name: "mode", value: "yellow" },
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Normal pale yellow"));
    assert!(html.contains("0.265 mg/mL"));

    let files = stored_files(&dir);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_sample.png"), "{}", files[0]);
    assert!(html.contains(&format!("/uploads/{}", files[0])));
    assert_eq!(std::fs::read(dir.path().join("uploads").join(&files[0])).unwrap(), png);
}

#[tokio::test]
async fn test_upload_uses_default_mode_when_absent() {
    let (app, _dir) = test_app();
    let png = solid_png([255, 255, 255]);

    let response = app
        .oneshot(upload_request(&[Part::File { name: "image", filename: "white.png", bytes: &png }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Clear"));
}

#[tokio::test]
async fn test_upload_garbage_is_rejected_and_not_stored() {
    let (app, dir) = test_app();

    let response = app
        .oneshot(upload_request(&[Part::File {
            name: "image",
            filename: "notes.png",
            bytes: b"definitely not an image",
        }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let (app, dir) = test_app();

    let response = app
        .oneshot(upload_request(&[Part::Text { name: "mode", value: "white" }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_upload_with_empty_filename_is_bad_request() {
    let (app, dir) = test_app();
    let png = solid_png([255, 255, 255]);

    let response = app
        .oneshot(upload_request(&[Part::File { name: "image", filename: "", bytes: &png }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_upload_with_unknown_mode_is_bad_request() {
    let (app, dir) = test_app();
    let png = solid_png([255, 255, 255]);

    let response = app
        .oneshot(upload_request(&[
            Part::File { name: "image", filename: "a.png", bytes: &png },
            Part::Text { name: "mode", value: "purple" },
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_upload_with_thai_filename_is_stored() {
    let (app, dir) = test_app();
    let png = solid_png([220, 180, 80]);

    let response = app
        .oneshot(upload_request(&[Part::File { name: "image", filename: "ภาพ", bytes: &png }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let files = stored_files(&dir);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_upload.png"), "{}", files[0]);
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_upload_bytes = 200;
    let (app, dir) = test_app_with(config);
    let png = solid_png([220, 180, 80]);
    assert!(png.len() > 200);

    let response = app
        .oneshot(upload_request(&[Part::File { name: "image", filename: "big.png", bytes: &png }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(stored_files(&dir).is_empty());
}

#[tokio::test]
async fn test_camera_capture_upload() {
    let (app, dir) = test_app();
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(solid_png([240, 80, 20])));

    let response = app
        .oneshot(upload_request(&[
            Part::Text { name: "camera_image", value: &data_url },
            Part::Text { name: "mode", value: "white" },
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let files = stored_files(&dir);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_capture.png"), "{}", files[0]);
}

#[tokio::test]
async fn test_concurrent_uploads_with_same_name_are_both_kept() {
    let (app, dir) = test_app();
    let first = solid_png([255, 255, 255]);
    let second = solid_png([220, 180, 80]);

    let (a, b) = tokio::join!(
        app.clone().oneshot(upload_request(&[Part::File {
            name: "image",
            filename: "same.png",
            bytes: &first
        }])),
        app.clone().oneshot(upload_request(&[Part::File {
            name: "image",
            filename: "same.png",
            bytes: &second
        }])),
    );
    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);

    let files = stored_files(&dir);
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.ends_with("_same.png")));

    let uploads = dir.path().join("uploads");
    let mut contents: Vec<Vec<u8>> = files
        .iter()
        .map(|f| std::fs::read(uploads.join(f)).unwrap())
        .collect();
    contents.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(contents, expected);
}

// ============================================================================
// Retrieval
// ============================================================================

#[tokio::test]
async fn test_stored_file_is_served_back() {
    let (app, dir) = test_app();
    let png = solid_png([255, 255, 255]);

    let response = app
        .clone()
        .oneshot(upload_request(&[Part::File { name: "image", filename: "back.png", bytes: &png }]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let name = stored_files(&dir).remove(0);
    let response = app.oneshot(get(&format!("/uploads/{}", name))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], &png[..]);
}

#[tokio::test]
async fn test_missing_upload_is_not_found() {
    let (app, _dir) = test_app();

    let response = app
        .clone()
        .oneshot(get("/uploads/20240101_000000_missing.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/uploads/..%2Fsecret.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_dir_is_created_on_demand() {
    let (app, dir) = test_app();
    assert!(!Path::new(&dir.path().join("uploads")).exists());

    let png = solid_png([255, 255, 255]);
    let response = app
        .oneshot(upload_request(&[Part::File { name: "image", filename: "a.png", bytes: &png }]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(dir.path().join("uploads").is_dir());
}

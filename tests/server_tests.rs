//! # Server Tests
//!
//! Drive the API router in-process with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use image::{DynamicImage, ImageFormat, RgbImage};
use printard::server::{AppState, ServerConfig, router};
use printard::sheet::Sheet;
use printard::source::SourceLoader;
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "printard-test-boundary";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_sheet(
        ServerConfig::default(),
        Sheet::default(),
        SourceLoader::new().unwrap(),
    ));
    (router(state.clone()), state)
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(63, 88, image::Rgb([1, 2, 3]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn multipart(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend(data);
    body.extend(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(cell: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/cells/{}/image", cell))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart(filename, content_type, data)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn test_sizes() {
    let (app, _) = app();
    let response = app.oneshot(get("/api/sizes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["papers"].as_array().unwrap().len(), 3);
    assert_eq!(json["cards"].as_array().unwrap().len(), 6);
    assert_eq!(json["cards"][4]["label"], "Poker (63×88mm)");
}

#[tokio::test]
async fn test_upload_marks_cell_occupied() {
    let (app, _) = app();
    let response = app
        .clone()
        .oneshot(upload_request("card-2", "art.png", "image/png", &png_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], "card-2");
    assert_eq!(json["format"], "png");

    let json = body_json(app.oneshot(get("/api/sheet")).await.unwrap()).await;
    assert_eq!(json["cells"][2]["occupied"], true);
    assert_eq!(json["cells"][0]["occupied"], false);
    assert_eq!(json["has_images"], true);
}

#[tokio::test]
async fn test_non_image_upload_rejected() {
    let (app, state) = app();
    let response = app
        .clone()
        .oneshot(upload_request("card-0", "notes.txt", "text/plain", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Declared as an image but not one
    let response = app
        .oneshot(upload_request("card-0", "fake.png", "image/png", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!state.sheet.read().await.grid().has_images());
}

#[tokio::test]
async fn test_upload_to_unknown_cell() {
    let (app, _) = app();
    let response = app
        .oneshot(upload_request("card-99", "a.png", "image/png", &png_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_card_resizes_grid() {
    let (app, state) = app();
    app.clone()
        .oneshot(upload_request("card-1", "a.png", "image/png", &png_bytes()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(put_json("/api/sheet", r#"{"card": "mini", "alignment": "top"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["card"], "mini");
    assert_eq!(json["layout"]["total_cells"], 16);
    assert_eq!(json["cells"].as_array().unwrap().len(), 16);
    assert_eq!(json["cells"][1]["occupied"], true);
    assert_eq!(json["options"]["alignment"], "top");

    let response = app
        .oneshot(put_json("/api/sheet", r#"{"paper": "letter"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.sheet.read().await.grid().len(), 16);
}

#[tokio::test]
async fn test_clear_all() {
    let (app, state) = app();
    app.clone()
        .oneshot(upload_request("card-0", "a.png", "image/png", &png_bytes()))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/cells/images")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sheet = state.sheet.read().await;
    assert!(!sheet.grid().has_images());
    assert_eq!(sheet.grid().len(), 9);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_pdf_download() {
    let (app, _) = app();
    app.clone()
        .oneshot(upload_request("card-0", "a.png", "image/png", &png_bytes()))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/export/pdf")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"layout-cards-A4-poker.pdf\""
    );
    assert_eq!(response.headers()["x-failed-cells"], "0");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_png_download() {
    let (app, _) = app();
    let response = app.oneshot(get("/api/export/png?dpi=25.4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (210, 297));
}

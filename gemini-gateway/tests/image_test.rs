mod common;

use common::{file_part, untyped_file_part, TestApp};
use gemini_gateway::services::providers::mock::MockTextProvider;
use gemini_gateway::services::providers::ContentPart;
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

#[tokio::test]
async fn png_upload_is_sent_as_image_png() {
    let app = TestApp::spawn().await;

    let form = Form::new()
        .text("prompt", "What is in this picture?")
        .part("image", untyped_file_part(PNG_BYTES, "photo.png"));
    let response = app.post_form("/generate-from-image", form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["text"], "Mock response for: What is in this picture?");

    let parts = app.only_request();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], ContentPart::text("What is in this picture?"));
    assert_eq!(parts[1].mime_type(), Some("image/png"));
}

#[tokio::test]
async fn non_png_upload_is_sent_as_image_jpeg() {
    let app = TestApp::spawn().await;

    let form = Form::new().part("image", untyped_file_part(b"jpeg-bytes", "photo.jpg"));
    let response = app.post_form("/generate-from-image", form).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.only_request()[1].mime_type(), Some("image/jpeg"));
}

#[tokio::test]
async fn image_bytes_are_base64_inlined() {
    let app = TestApp::spawn().await;

    let form = Form::new().part("image", file_part(b"hello", "photo.png", "image/png"));
    app.post_form("/generate-from-image", form).await;

    assert_eq!(
        app.only_request()[1],
        ContentPart::InlineMedia {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        }
    );
}

#[tokio::test]
async fn missing_prompt_defaults_to_describe_the_image() {
    let app = TestApp::spawn().await;

    let form = Form::new().part("image", untyped_file_part(PNG_BYTES, "photo.png"));
    app.post_form("/generate-from-image", form).await;

    assert_eq!(app.only_request()[0], ContentPart::text("Describe the image"));
}

#[tokio::test]
async fn empty_prompt_defaults_to_describe_the_image() {
    let app = TestApp::spawn().await;

    let form = Form::new()
        .text("prompt", "")
        .part("image", untyped_file_part(PNG_BYTES, "photo.png"));
    app.post_form("/generate-from-image", form).await;

    assert_eq!(app.only_request()[0], ContentPart::text("Describe the image"));
}

#[tokio::test]
async fn staged_image_is_deleted_after_success() {
    let app = TestApp::spawn().await;

    let form = Form::new().part("image", untyped_file_part(PNG_BYTES, "photo.png"));
    let response = app.post_form("/generate-from-image", form).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn failure_returns_fixed_error_and_deletes_staged_image() {
    let app = TestApp::spawn_failing().await;

    let form = Form::new().part("image", untyped_file_part(PNG_BYTES, "photo.png"));
    let response = app.post_form("/generate-from-image", form).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "error": "Failed to generate text from image" }));
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn missing_image_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let form = Form::new().text("prompt", "Describe it");
    let response = app.post_form("/generate-from-image", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "No image uploaded");
    assert!(app.provider.requests().is_empty());
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn file_under_another_field_name_is_not_staged() {
    let app = TestApp::spawn().await;

    let form = Form::new().part("picture", untyped_file_part(PNG_BYTES, "photo.png"));
    let response = app.post_form("/generate-from-image", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn concurrent_uploads_each_clean_up_their_own_file() {
    let app =
        TestApp::spawn_with(MockTextProvider::new(true).with_delay(Duration::from_millis(200)))
            .await;

    let first = app.post_form(
        "/generate-from-image",
        Form::new()
            .text("prompt", "first")
            .part("image", untyped_file_part(b"one", "one.png")),
    );
    let second = app.post_form(
        "/generate-from-image",
        Form::new()
            .text("prompt", "second")
            .part("image", untyped_file_part(b"two", "two.jpg")),
    );

    let (first, second) = futures::join!(first, second);

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    let first: serde_json::Value = first.json().await.unwrap();
    let second: serde_json::Value = second.json().await.unwrap();
    assert_eq!(first["text"], "Mock response for: first");
    assert_eq!(second["text"], "Mock response for: second");

    assert_eq!(app.provider.requests().len(), 2);
    assert!(app.staged_files().is_empty());
}

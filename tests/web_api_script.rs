//! Web API Script Tests
//!
//! Integration tests for the upload, listing, retrieval and page endpoints.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use meteorz::file::ScriptStorage;
use meteorz::web::handlers::AppState;
use meteorz::web::router::create_router;
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test server over a fresh storage directory.
///
/// The storage directory is `<temp>/uploads` so tests can check that nothing
/// escapes into `<temp>`.
fn create_test_server() -> (TestServer, TempDir, ScriptStorage) {
    create_test_server_with_limit(None)
}

fn create_test_server_with_limit(limit: Option<usize>) -> (TestServer, TempDir, ScriptStorage) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = ScriptStorage::open(temp_dir.path().join("uploads"))
        .expect("Failed to open storage");

    let app_state = Arc::new(AppState::new(storage.clone()));
    let router = create_router(app_state, &[], limit);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, temp_dir, storage)
}

/// Build a form with one file in the `scriptFile` field.
fn script_form(filename: &str, content: &[u8]) -> MultipartForm {
    let part = Part::bytes(content.to_vec())
        .file_name(filename.to_string())
        .mime_type("application/octet-stream");
    MultipartForm::new().add_part("scriptFile", part)
}

async fn upload(server: &TestServer, filename: &str, content: &[u8]) -> Value {
    let response = server
        .post("/upload")
        .multipart(script_form(filename, content))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn list(server: &TestServer) -> Vec<String> {
    let response = server.get("/scripts").await;
    response.assert_status_ok();
    let body: Value = response.json();
    serde_json::from_value(body["scripts"].clone()).unwrap()
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_returns_stored_name() {
    let (server, _temp_dir, storage) = create_test_server();

    let body = upload(&server, "hello.txt", b"hi").await;

    assert_eq!(
        body,
        json!({ "message": "Script uploaded", "filename": "hello.txt" })
    );
    assert!(storage.exists("hello.txt"));
}

#[tokio::test]
async fn test_upload_without_file() {
    let (server, _temp_dir, storage) = create_test_server();

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(storage.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_text_field_is_not_a_file() {
    let (server, _temp_dir, storage) = create_test_server();

    let form = MultipartForm::new().add_text("scriptFile", "just text");
    let response = server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No file uploaded");
    assert!(storage.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_two_files_rejected() {
    let (server, _temp_dir, storage) = create_test_server();

    let form = script_form("one.txt", b"1").add_part(
        "scriptFile",
        Part::bytes(b"2".to_vec()).file_name("two.txt"),
    );
    let response = server.post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(storage.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_ignores_other_fields() {
    let (server, _temp_dir, _storage) = create_test_server();

    let form = script_form("tool.lua", b"print('x')").add_text("description", "ignored");
    let response = server.post("/upload").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(list(&server).await, vec!["tool.lua"]);
}

#[tokio::test]
async fn test_upload_rejects_reserved_names() {
    let (server, temp_dir, storage) = create_test_server();

    for name in ["..", ".hidden", ".upload-1234"] {
        let response = server
            .post("/upload")
            .multipart(script_form(name, b"evil"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid filename");
    }

    assert!(storage.list().unwrap().is_empty());
    let leftovers = fs::read_dir(storage.base_path()).unwrap().count();
    assert_eq!(leftovers, 0);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_upload_over_body_limit() {
    let (server, _temp_dir, storage) = create_test_server_with_limit(Some(64));

    let response = server
        .post("/upload")
        .multipart(script_form("big.bin", &[0u8; 4096]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(!storage.exists("big.bin"));
}

#[tokio::test]
async fn test_upload_without_multipart_body() {
    let (server, _temp_dir, storage) = create_test_server();

    let response = server.post("/upload").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(storage.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_json_body_is_not_a_file() {
    let (server, _temp_dir, storage) = create_test_server();

    let response = server
        .post("/upload")
        .json(&json!({ "scriptFile": "hello.txt" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No file uploaded");
    assert!(storage.list().unwrap().is_empty());
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_list_empty() {
    let (server, _temp_dir, _storage) = create_test_server();

    let response = server.get("/scripts").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "scripts": [] }));
}

#[tokio::test]
async fn test_list_is_sorted() {
    let (server, _temp_dir, _storage) = create_test_server();

    upload(&server, "zeta.lua", b"z").await;
    upload(&server, "alpha.lua", b"a").await;
    upload(&server, "mid.lua", b"m").await;

    assert_eq!(list(&server).await, vec!["alpha.lua", "mid.lua", "zeta.lua"]);
}

#[tokio::test]
async fn test_list_unreadable_directory() {
    let (server, _temp_dir, storage) = create_test_server();
    fs::remove_dir(storage.base_path()).unwrap();

    let response = server.get("/scripts").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Cannot read scripts folder");
    assert_eq!(body["code"], "INTERNAL_ERROR");
}

// ============================================================================
// Retrieval Tests
// ============================================================================

#[tokio::test]
async fn test_get_script_content_type() {
    let (server, _temp_dir, _storage) = create_test_server();
    upload(&server, "notes.txt", b"plain text").await;

    let response = server.get("/scripts/notes.txt").await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/plain");
    assert_eq!(response.text(), "plain text");
}

#[tokio::test]
async fn test_get_script_unknown_extension() {
    let (server, _temp_dir, _storage) = create_test_server();
    upload(&server, "blob.zzqx", b"\x00\x01\x02").await;

    let response = server.get("/scripts/blob.zzqx").await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type"),
        "application/octet-stream"
    );
    assert_eq!(&response.as_bytes()[..], b"\x00\x01\x02");
}

#[tokio::test]
async fn test_get_script_binary_round_trip() {
    let (server, _temp_dir, _storage) = create_test_server();
    let content: Vec<u8> = (0..=255).cycle().take(100_000).collect();
    upload(&server, "payload.bin", &content).await;

    let response = server.get("/scripts/payload.bin").await;

    response.assert_status_ok();
    assert_eq!(&response.as_bytes()[..], content.as_slice());
}

#[tokio::test]
async fn test_get_missing_script() {
    let (server, _temp_dir, _storage) = create_test_server();

    let response = server.get("/scripts/missing.txt").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Script not found");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_rejects_path_traversal() {
    let (server, temp_dir, _storage) = create_test_server();
    fs::write(temp_dir.path().join("secret.txt"), b"top secret").unwrap();

    let response = server.get("/scripts/..%2Fsecret.txt").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Script not found");
}

#[tokio::test]
async fn test_get_undecodable_name() {
    let (server, _temp_dir, _storage) = create_test_server();

    let response = server.get("/scripts/%FF").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Script not found");
    assert_eq!(body["code"], "NOT_FOUND");
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_index_page() {
    let (server, _temp_dir, _storage) = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let page = response.text();
    assert!(page.contains("Meteorz Script Library"));
    assert!(page.contains("No scripts uploaded yet."));
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_upload_list_get_replace_scenario() {
    let (server, _temp_dir, _storage) = create_test_server();

    upload(&server, "hello.txt", b"hi").await;
    assert_eq!(list(&server).await, vec!["hello.txt"]);

    let response = server.get("/scripts/hello.txt").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "hi");

    upload(&server, "hello.txt", b"bye").await;
    assert_eq!(list(&server).await, vec!["hello.txt"]);

    let response = server.get("/scripts/hello.txt").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "bye");

    let response = server.get("/scripts/missing.txt").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_unicode_name_round_trip() {
    let (server, _temp_dir, storage) = create_test_server();

    storage.save("スクリプト.lua", b"-- lua").unwrap();
    assert_eq!(list(&server).await, vec!["スクリプト.lua"]);

    let response = server
        .get("/scripts/%E3%82%B9%E3%82%AF%E3%83%AA%E3%83%97%E3%83%88.lua")
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "-- lua");
}

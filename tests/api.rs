use std::fs;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use tabconv::api::{OUTPUT_FILE_NAME, TabconvApi};
use tabconv::conf::ServerConfig;
use tabconv::testutil::{MultipartBody, included_tables, replication_document, temp_server_config};

const CSV: &str = "owner,table\nsales,orders\nhr,employees\n";

async fn setup() -> (TempDir, ServerConfig, Router) {
    let (dir, config) = temp_server_config();
    let api = TabconvApi::new(config.clone()).await.unwrap();
    let router = api.router();
    (dir, config, router)
}

fn convert_request(body: MultipartBody) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, MultipartBody::content_type())
        .body(Body::from(body.finish()))
        .unwrap()
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, header::HeaderMap, Vec<u8>) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, bytes)
}

fn upload_dir_is_empty(config: &ServerConfig) -> bool {
    fs::read_dir(&config.upload_dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_index_serves_form() {
    let (_dir, _config, router) = setup().await;
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, headers, body) = send(router, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("name=\"csv_file\""));
    assert!(html.contains("name=\"json_input_file\""));
    assert!(html.contains("action=\"/convert\""));
}

#[tokio::test]
async fn test_health() {
    let (_dir, _config, router) = setup().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, _, body) = send(router, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_convert_csv_only() {
    let (_dir, config, router) = setup().await;
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", CSV.as_bytes())
        .file("json_input_file", "", b"")
        .text("skip_headers", "on")
        .text("action", "replace");

    let (status, headers, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"output.json\""
    );
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "{\"owner\": \"sales\", \"name\": \"orders\"},\n{\"owner\": \"hr\", \"name\": \"employees\"}\n"
    );
    assert!(upload_dir_is_empty(&config));
    assert!(config.result_dir.join(OUTPUT_FILE_NAME).exists());
}

#[tokio::test]
async fn test_convert_without_header_checkbox() {
    let (_dir, _config, router) = setup().await;
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", b"sales,orders\n")
        .text("action", "replace");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "{\"owner\": \"sales\", \"name\": \"orders\"}\n"
    );
}

#[tokio::test]
async fn test_convert_merge_into_document() {
    let (_dir, config, router) = setup().await;
    let document = replication_document(json!([{"owner": "x", "name": "y"}]));
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", CSV.as_bytes())
        .file("json_input_file", "task.json", document.to_string().as_bytes())
        .text("skip_headers", "on")
        .text("action", "merge");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("{\n    \"name\": \"nightly\",\n"));
    let result: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        included_tables(&result),
        &json!([
            {"owner": "x", "name": "y"},
            {"owner": "sales", "name": "orders"},
            {"owner": "hr", "name": "employees"}
        ])
    );
    assert_eq!(result["description"], "generated");
    assert!(upload_dir_is_empty(&config));
}

#[tokio::test]
async fn test_convert_replace_document() {
    let (_dir, _config, router) = setup().await;
    let document = replication_document(json!([{"owner": "x", "name": "y"}]));
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", CSV.as_bytes())
        .file("json_input_file", "task.json", document.to_string().as_bytes())
        .text("skip_headers", "on")
        .text("action", "replace");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        included_tables(&result),
        &json!([
            {"owner": "sales", "name": "orders"},
            {"owner": "hr", "name": "employees"}
        ])
    );
}

#[tokio::test]
async fn test_missing_csv_redirects() {
    let (_dir, _config, router) = setup().await;
    let body = MultipartBody::new()
        .file("csv_file", "", b"")
        .text("action", "replace");

    let (status, headers, _) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
}

#[tokio::test]
async fn test_malformed_row_is_rejected() {
    let (_dir, config, router) = setup().await;
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", b"owner,table\nbroken\n")
        .text("skip_headers", "on")
        .text("action", "replace");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "MALFORMED_ROW");
    assert!(!config.result_dir.join(OUTPUT_FILE_NAME).exists());
    assert!(upload_dir_is_empty(&config));
}

#[tokio::test]
async fn test_document_without_table_path_is_rejected() {
    let (_dir, config, router) = setup().await;
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", CSV.as_bytes())
        .file("json_input_file", "task.json", br#"{"cmd": {}}"#)
        .text("skip_headers", "on")
        .text("action", "merge");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "MALFORMED_JSON");
    assert!(upload_dir_is_empty(&config));
}

#[tokio::test]
async fn test_unknown_action_is_rejected() {
    let (_dir, config, router) = setup().await;
    let body = MultipartBody::new()
        .file("csv_file", "tables.csv", CSV.as_bytes())
        .text("action", "append");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "INVALID_MODE");
    assert!(upload_dir_is_empty(&config));
}

#[tokio::test]
async fn test_missing_action_is_rejected() {
    let (_dir, _config, router) = setup().await;
    let body = MultipartBody::new().file("csv_file", "tables.csv", CSV.as_bytes());

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_new_creates_directories() {
    let (_dir, config) = temp_server_config();
    assert!(!config.upload_dir.exists());

    TabconvApi::new(config.clone()).await.unwrap();

    assert!(config.upload_dir.is_dir());
    assert!(config.result_dir.is_dir());
}

#[tokio::test]
async fn test_timed_out_request_still_removes_uploads() {
    let (_dir, mut config) = temp_server_config();
    config.request_timeout = Duration::from_millis(1);
    let router = TabconvApi::new(config.clone()).await.unwrap().router();
    let csv: String = (0..400_000)
        .map(|i| format!("owner{i},table{i}\n"))
        .collect();
    let body = MultipartBody::new()
        .file("csv_file", "big.csv", csv.as_bytes())
        .text("action", "replace");

    let (status, _, _) = send(router, convert_request(body)).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    // The conversion keeps running in the background; wait for its cleanup.
    for _ in 0..200 {
        if upload_dir_is_empty(&config) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(upload_dir_is_empty(&config));
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let (_dir, mut config) = temp_server_config();
    config.max_upload_size = 1024;
    let router = TabconvApi::new(config.clone()).await.unwrap().router();
    let csv = "sales,orders\n".repeat(400);
    let body = MultipartBody::new()
        .file("csv_file", "big.csv", csv.as_bytes())
        .text("action", "replace");

    let (status, _, body) = send(router, convert_request(body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    assert!(upload_dir_is_empty(&config));
}

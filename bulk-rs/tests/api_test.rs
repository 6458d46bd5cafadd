//! Integration tests for the REST API

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bulk_rs::api::{ApiServer, AppState, OWNER_HEADER};
use bulk_rs::config::Config;
use bulk_rs::db;
use bulk_rs::delivery::{DeliveryTransport, RecordingTransport};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "bulk-rs-test-boundary";
const OWNER: &str = "owner-1";

async fn setup_router(transport: Arc<RecordingTransport>) -> Router {
    let mut config = Config::default();
    config.delivery.send_delay_ms = 0;

    let pool = db::connect("sqlite::memory:").await.unwrap();
    db::init_schema(&pool).await.unwrap();

    let transport: Arc<dyn DeliveryTransport> = transport;
    let state = Arc::new(AppState::new(pool, &config, transport));
    ApiServer::new(state, "127.0.0.1:0".to_string()).router()
}

fn multipart_body(file_name: &str, content_type: &str, content: &str) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: {ct}\r\n\r\n\
         {c}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        ct = content_type,
        c = content
    )
}

fn upload_request(file_name: &str, content_type: &str, content: &str) -> Request<Body> {
    Request::post("/api/contacts/upload")
        .header(OWNER_HEADER, OWNER)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(file_name, content_type, content)))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(OWNER_HEADER, OWNER)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(OWNER_HEADER, OWNER)
        .body(Body::empty())
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, body)
}

async fn connect_account(router: &Router) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/connections",
            json!({
                "phone_number": "+1000",
                "business_account_id": "acct-1",
                "access_token": "token"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;
    let (status, body) = send(&router, Request::get("/api/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_owner_is_unauthorized() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;
    let (status, _) = send(&router, Request::get("/api/contacts").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_and_list_contacts() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    let csv = "Name,Phone,Email\nJohn Doe,+1234567890,john@example.com\n,+1555,skip@example.com\nAnn,+1666,";
    let (status, body) = send(&router, upload_request("contacts.csv", "text/csv", csv)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);

    let (status, body) = send(&router, get_request("/api/contacts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"name": "John Doe", "phone": "+1234567890", "email": "john@example.com"},
            {"name": "Ann", "phone": "+1666", "email": ""}
        ])
    );
}

#[tokio::test]
async fn test_upload_rejections() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    let (status, _) = send(
        &router,
        upload_request("contacts.txt", "text/plain", "Name,Phone\nAnn,+1555"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&router, upload_request("contacts.csv", "text/csv", "Name,Phone\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("header and one data row"));

    let (status, _) = send(
        &router,
        upload_request("contacts.csv", "text/csv", "Email,City\na@b.com,Paris"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        upload_request("contacts.csv", "text/csv", "Name,Phone\n,+1555\nAnn,"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("No valid contacts"));
}

fn csv_of_size(bytes: usize) -> String {
    let header = "Name,Phone\nAnn,+1555\n";
    format!("{}{}", header, "x".repeat(bytes - header.len()))
}

#[tokio::test]
async fn test_oversized_upload_is_payload_too_large() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;
    const MB: usize = 1024 * 1024;

    // Just over the file limit, and past the request body limit
    for size in [6 * MB, 11 * MB] {
        let (status, body) = send(&router, upload_request("a.csv", "text/csv", &csv_of_size(size))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "upload of {} bytes", size);
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    let (_, body) = send(&router, get_request("/api/contacts")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_upload_keeps_previous_list() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    send(&router, upload_request("a.csv", "text/csv", "Name,Phone\nAnn,+1555")).await;
    send(&router, upload_request("b.csv", "text/csv", "Name,Phone\n")).await;

    let (_, body) = send(&router, get_request("/api/contacts")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_demo_download() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;
    let response = router
        .oneshot(Request::get("/api/contacts/demo").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("demo-contacts.csv"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert_eq!(text.lines().next(), Some("Name,Phone,Email"));
}

#[tokio::test]
async fn test_preview() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/messages/preview",
            json!({"template": "Hi {name}, mail {email}. Code {code}"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rendered"], "Hi John Doe, mail john@example.com. Code {code}");
    assert_eq!(body["max_length"], 1000);
    assert_eq!(body["unknown_placeholders"], json!(["code"]));
}

#[tokio::test]
async fn test_overlong_message_rejected() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    let (status, _) = send(
        &router,
        json_request("POST", "/api/messages/preview", json!({"template": "x".repeat(1001)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_checks_preconditions() {
    let transport = Arc::new(RecordingTransport::new());
    let router = setup_router(transport.clone()).await;

    let (status, body) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("enter a message"));

    let (status, body) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "Hi {name}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("upload contacts"));

    send(&router, upload_request("a.csv", "text/csv", "Name,Phone\nAnn,+1555")).await;
    let (status, body) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "Hi {name}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("connect"));

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_send_to_all_contacts() {
    let transport = Arc::new(RecordingTransport::new());
    let router = setup_router(transport.clone()).await;

    send(
        &router,
        upload_request(
            "a.csv",
            "text/csv",
            "Name,Phone,Email\nAnn,+1555,ann@example.com\nBob,+1666,",
        ),
    )
    .await;
    connect_account(&router).await;

    let (status, body) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "Hi {name} ({email})"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivered"], 2);
    let message_id = body["message_id"].as_str().unwrap().to_string();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].message, "Hi Ann (ann@example.com)");
    assert_eq!(sent[1].message, "Hi Bob ()");

    let (_, body) = send(&router, get_request("/api/messages")).await;
    assert_eq!(body[0]["id"], message_id.as_str());
    assert_eq!(body[0]["status"], "sent");
    assert_eq!(body[0]["content"], "Hi {name} ({email})");

    let (status, body) = send(&router, get_request(&format!("/api/messages/{}/sends", message_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "sent");
    assert_eq!(body[1]["phone"], "+1666");

    let (_, stats) = send(&router, get_request("/api/stats")).await;
    assert_eq!(stats["contacts"], 2);
    assert_eq!(stats["connected"], true);
}

#[tokio::test]
async fn test_aborted_send() {
    let transport = Arc::new(RecordingTransport::failing_at(1));
    let router = setup_router(transport.clone()).await;

    send(
        &router,
        upload_request("a.csv", "text/csv", "Name,Phone\nAnn,+1555\nBob,+1666\nCy,+1777"),
    )
    .await;
    connect_account(&router).await;

    let (status, _) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "Hi {name}"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(transport.sent().len(), 1);

    let (_, body) = send(&router, get_request("/api/messages")).await;
    assert_eq!(body[0]["status"], "failed");
}

#[tokio::test]
async fn test_sends_hidden_from_other_owners() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    send(&router, upload_request("a.csv", "text/csv", "Name,Phone\nAnn,+1555")).await;
    connect_account(&router).await;
    let (_, body) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "Hi"})),
    )
    .await;
    let message_id = body["message_id"].as_str().unwrap();

    let request = Request::get(format!("/api/messages/{}/sends", message_id))
        .header(OWNER_HEADER, "someone-else")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disconnect_blocks_send() {
    let router = setup_router(Arc::new(RecordingTransport::new())).await;

    send(&router, upload_request("a.csv", "text/csv", "Name,Phone\nAnn,+1555")).await;
    let connection_id = connect_account(&router).await;

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            &format!("/api/connections/{}/disconnect", connection_id),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, connections) = send(&router, get_request("/api/connections")).await;
    assert_eq!(connections[0]["status"], "disconnected");
    assert!(connections[0].get("access_token").is_none());

    let (status, _) = send(
        &router,
        json_request("POST", "/api/messages/send", json!({"template": "Hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

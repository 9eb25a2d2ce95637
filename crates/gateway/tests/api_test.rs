//! Integration tests for API endpoints.
//!
//! The router runs over an in-memory store (or a mocked one for failure
//! cases), so no file system or network access is needed.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::AppError;
use registration_service_lib::store::{MemoryStore, MockRecordStore, RecordStore};
use registration_service_lib::RegistrationService;

// =============================================================================
// Helpers
// =============================================================================

fn router(store: Arc<dyn RecordStore>) -> Router {
    gateway_lib::app(RegistrationService::with_store(store))
}

fn jo_lee() -> Value {
    json!({
        "parentName": "Jo Lee",
        "parentEmail": "jo@x.com",
        "parentPhone": "555-1",
        "childNames": "Amy",
        "childAges": "6",
        "emergencyContactName": "Pat",
        "emergencyContactPhone": "555-2"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Registrations
// =============================================================================

#[tokio::test]
async fn test_create_then_list() {
    let store = Arc::new(MemoryStore::new());
    let app = router(store.clone());

    let (status, created) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["checkedIn"], json!(false));
    assert_eq!(created["allergies"], json!(""));
    assert!(created["registrationDate"].as_str().unwrap().ends_with('Z'));

    let (status, headers, bytes) = send(&app, Method::GET, "/registrations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get("x-store-warning").is_none());
    let listed: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn test_create_missing_fields_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = router(store.clone());

    let mut body = jo_lee();
    body["parentPhone"] = json!("");
    body.as_object_mut().unwrap().remove("childAges");

    let (status, error) = send_json(&app, Method::POST, "/registrations", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    let message = error["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Missing required fields"));
    assert!(message.contains("parentPhone"));
    assert!(message.contains("childAges"));
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_create_accepts_null_notes() {
    let store = Arc::new(MemoryStore::new());
    let app = router(store.clone());

    let mut body = jo_lee();
    body["allergies"] = Value::Null;
    body["neurodivergencies"] = Value::Null;

    let (status, created) = send_json(&app, Method::POST, "/registrations", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["allergies"], json!(""));
    assert_eq!(created["neurodivergencies"], json!(""));
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = router(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/registrations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_filters_list() {
    let app = router(Arc::new(MemoryStore::new()));
    send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let mut other = jo_lee();
    other["parentName"] = json!("Sam Roe");
    other["parentEmail"] = json!("sam@y.org");
    other["childNames"] = json!("Max");
    send_json(&app, Method::POST, "/registrations", Some(other)).await;

    let (_, listed) = send_json(&app, Method::GET, "/registrations?search=JO%20LEE", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["parentName"], "Jo Lee");

    let (_, listed) = send_json(&app, Method::GET, "/registrations?search=max", None).await;
    assert_eq!(listed[0]["childNames"], "Max");
}

#[tokio::test]
async fn test_patch_merges_and_ignores_protected_fields() {
    let app = router(Arc::new(MemoryStore::new()));
    let (_, created) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let uri = format!("/registrations/{}", created["id"].as_str().unwrap());

    let (status, _) = send_json(&app, Method::PATCH, &uri, Some(json!({ "allergies": "peanuts" }))).await;
    assert_eq!(status, StatusCode::OK);

    let patch = json!({ "checkedIn": true, "id": "other", "registrationDate": "2000-01-01T00:00:00.000Z" });
    let (status, updated) = send_json(&app, Method::PATCH, &uri, Some(patch)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(updated["allergies"], "peanuts");
    assert_eq!(updated["checkedIn"], json!(true));
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["registrationDate"], created["registrationDate"]);

    let (_, fetched) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_patch_cannot_blank_required_fields() {
    let store = Arc::new(MemoryStore::new());
    let app = router(store.clone());
    let (_, created) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let uri = format!("/registrations/{}", created["id"].as_str().unwrap());
    let saves = store.save_count();

    let (status, error) = send_json(&app, Method::PATCH, &uri, Some(json!({ "parentName": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send_json(&app, Method::PATCH, &uri, Some(json!({ "childNames": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, Method::PATCH, &uri, Some(json!({ "allergies": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.save_count(), saves + 1);
}

#[tokio::test]
async fn test_check_in_toggles() {
    let app = router(Arc::new(MemoryStore::new()));
    let (_, created) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let uri = format!("/registrations/{}/check-in", created["id"].as_str().unwrap());

    let (status, toggled) = send_json(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["checkedIn"], json!(true));

    let (_, toggled) = send_json(&app, Method::POST, &uri, None).await;
    assert_eq!(toggled["checkedIn"], json!(false));
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let store = Arc::new(MemoryStore::new());
    let app = router(store.clone());
    let (_, created) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let uri = format!("/registrations/{}", created["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Registration deleted successfully" }));

    let document = store.document();
    let (status, error) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "NOT_FOUND");

    let (status, _) = send_json(&app, Method::PATCH, &uri, Some(json!({ "checkedIn": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.document(), document);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_unreadable_store_degrades_list_with_header() {
    let mut store = MockRecordStore::new();
    store
        .expect_fetch()
        .returning(|| Err(AppError::configuration("Missing GitHub token or Gist ID")));
    store.expect_backend().return_const("gist");
    store.expect_save().never();
    let app = router(Arc::new(store));

    let (status, headers, bytes) = send(&app, Method::GET, "/registrations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"[]");
    let warning = headers.get("x-store-warning").unwrap().to_str().unwrap();
    assert!(warning.contains("Missing GitHub token"));

    let (status, error) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["error"]["code"], "CONFIGURATION_ERROR");

    let (status, health) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_save_failure_is_a_server_error_with_generic_message() {
    let mut store = MockRecordStore::new();
    store.expect_fetch().returning(|| Ok(Vec::new()));
    store
        .expect_save()
        .returning(|_| Err(AppError::persistence("failed to update gist: 502 Bad Gateway")));
    let app = router(Arc::new(store));

    let (status, error) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["error"]["code"], "PERSISTENCE_ERROR");
    assert_eq!(error["error"]["message"], "Registrations could not be saved");
}

#[tokio::test]
async fn test_unreadable_store_flags_every_report() {
    let mut store = MockRecordStore::new();
    store
        .expect_fetch()
        .returning(|| Err(AppError::configuration("Missing GitHub token or Gist ID")));
    store.expect_backend().return_const("gist");
    store.expect_save().never();
    let app = router(Arc::new(store));

    for uri in [
        "/reports/stats",
        "/reports/registrations.csv",
        "/reports/print",
        "/reports/name-tags",
    ] {
        let (status, headers, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        let warning = headers
            .get("x-store-warning")
            .unwrap_or_else(|| panic!("no warning on {}", uri))
            .to_str()
            .unwrap();
        assert!(warning.contains("Missing GitHub token"), "{}", uri);
    }

    let (_, stats) = send_json(&app, Method::GET, "/reports/stats", None).await;
    assert_eq!(stats, json!({ "total": 0, "checkedIn": 0, "remaining": 0 }));
}

// =============================================================================
// Reports and health
// =============================================================================

#[tokio::test]
async fn test_stats_count_check_ins() {
    let app = router(Arc::new(MemoryStore::new()));
    let (_, first) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let uri = format!("/registrations/{}/check-in", first["id"].as_str().unwrap());
    send_json(&app, Method::POST, &uri, None).await;

    let (status, stats) = send_json(&app, Method::GET, "/reports/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, json!({ "total": 2, "checkedIn": 1, "remaining": 1 }));
    let (_, headers, _) = send(&app, Method::GET, "/reports/stats", None).await;
    assert!(headers.get("x-store-warning").is_none());
}

#[tokio::test]
async fn test_csv_export_is_an_attachment() {
    let app = router(Arc::new(MemoryStore::new()));
    send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;

    let (status, headers, bytes) = send(&app, Method::GET, "/reports/registrations.csv", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("wild-senses-registrations-"));
    let csv = String::from_utf8(bytes).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.lines().nth(1).unwrap().starts_with("\"Amy\",\"6\",\"Jo Lee\""));
}

#[tokio::test]
async fn test_name_tags_only_for_waiting_children() {
    let app = router(Arc::new(MemoryStore::new()));
    let (_, arrived) = send_json(&app, Method::POST, "/registrations", Some(jo_lee())).await;
    let mut waiting = jo_lee();
    waiting["childNames"] = json!("Waiting Child");
    send_json(&app, Method::POST, "/registrations", Some(waiting)).await;
    let uri = format!("/registrations/{}/check-in", arrived["id"].as_str().unwrap());
    send_json(&app, Method::POST, &uri, None).await;

    let (status, headers, bytes) = send(&app, Method::GET, "/reports/name-tags", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("Waiting Child"));
    assert!(!html.contains(">Amy<"));
}

#[tokio::test]
async fn test_health_reports_backend() {
    let app = router(Arc::new(MemoryStore::new()));

    let (status, health) = send_json(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["store"]["backend"], "memory");
}

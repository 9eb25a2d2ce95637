//! Sync client tests against an in-process gateway.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use common::AppError;
use domain::{NewRegistration, Registration};
use registration_service_lib::store::{MemoryStore, MockRecordStore, RecordStore};
use registration_service_lib::RegistrationService;
use sync_client::SyncClient;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}

async fn serve_store(store: Arc<dyn RecordStore>) -> String {
    serve(gateway_lib::app(RegistrationService::with_store(store))).await
}

fn registration(id: &str) -> Registration {
    let form = NewRegistration {
        parent_name: "Jo Lee".to_string(),
        parent_email: "jo@x.com".to_string(),
        parent_phone: "555-1".to_string(),
        child_names: "Amy".to_string(),
        child_ages: "6".to_string(),
        emergency_contact_name: "Pat".to_string(),
        emergency_contact_phone: "555-2".to_string(),
        ..NewRegistration::default()
    };
    Registration::new(id.to_string(), form, chrono::Utc::now())
}

#[tokio::test]
async fn test_fetch_returns_stored_registrations() {
    let stored = vec![registration("1"), registration("2")];
    let store = Arc::new(MemoryStore::with_registrations(&stored).unwrap());
    let base_url = serve_store(store).await;

    let client = SyncClient::new(format!("{}/", base_url)).unwrap();
    let outcome = client.fetch().await;

    assert_eq!(outcome.error, None);
    assert_eq!(outcome.registrations, stored);
    assert_eq!(client.try_fetch().await.unwrap(), stored);
}

#[tokio::test]
async fn test_degraded_server_read_is_surfaced() {
    let mut store = MockRecordStore::new();
    store
        .expect_fetch()
        .returning(|| Err(AppError::persistence("failed to fetch gist: 503")));
    store.expect_backend().return_const("gist");
    let base_url = serve_store(Arc::new(store)).await;

    let client = SyncClient::new(base_url).unwrap();
    let outcome = client.fetch().await;

    assert!(outcome.registrations.is_empty());
    assert!(outcome.error.unwrap().contains("failed to fetch gist"));
    assert!(client.try_fetch().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_status_yields_empty_list() {
    let app = Router::new().route(
        "/registrations",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let client = SyncClient::new(serve(app).await).unwrap();

    let outcome = client.fetch().await;

    assert!(outcome.registrations.is_empty());
    assert!(outcome.error.unwrap().contains("502"));
    assert!(matches!(
        client.try_fetch().await,
        Err(AppError::ServiceUnavailable(_))
    ));
}

#[tokio::test]
async fn test_undecodable_body_yields_empty_list() {
    let app = Router::new().route("/registrations", get(|| async { "<html>not json</html>" }));
    let client = SyncClient::new(serve(app).await).unwrap();

    let outcome = client.fetch().await;

    assert!(outcome.registrations.is_empty());
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn test_unreachable_server_yields_empty_list() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let outcome = SyncClient::new(base_url).unwrap().fetch().await;

    assert!(outcome.registrations.is_empty());
    assert!(outcome.error.is_some());
}

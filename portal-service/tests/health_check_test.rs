//! Health endpoint integration test.

mod common;

use common::TestApp;
use service_core::axum::http::StatusCode;

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "portal-service");
}

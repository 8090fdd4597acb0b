//! Portal existence and client slug lookup integration tests.

mod common;

use common::TestApp;
use serde_json::json;
use service_core::axum::http::StatusCode;

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn existing_portal_reports_display_name() {
    let app = TestApp::spawn().await;
    app.seed_account(Some("Acme & Co.")).await;

    let (status, body) = app
        .post("/portal/check", json!({ "slug": "acme-co" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
    assert_eq!(body["display_name"], "Acme & Co.");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn missing_portal_reports_not_exists() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/portal/check", json!({ "slug": "nobody-here" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
    assert!(body.get("display_name").is_none());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn slug_collision_resolves_to_oldest_account() {
    let app = TestApp::spawn().await;
    // Both names derive the slug "acme-co"; the older account wins
    app.seed_account(Some("Acme & Co.")).await;
    app.seed_account(Some("Acme Co")).await;

    let (status, body) = app
        .post("/portal/check", json!({ "slug": "acme-co" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
    assert_eq!(body["display_name"], "Acme & Co.");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn client_slug_locates_the_member() {
    let app = TestApp::spawn().await;
    let account_id = app.seed_account(Some("Acme & Co.")).await;
    let client_id = app
        .seed_client(account_id, "Greta", "Globex", "greta@globex.com", Some("Globex"))
        .await;
    app.seed_member(
        account_id,
        client_id,
        "acme-co",
        "globex",
        "jane@globex.com",
        "Jane Doe",
        "viewer",
    )
    .await;

    let (status, body) = app
        .post(
            "/portal/client-slug",
            json!({ "email": "jane@globex.com", "company_slug": "acme-co" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["client_slug"], "globex");
    assert_eq!(body["company_slug"], "acme-co");
    assert_eq!(body["name"], "Jane Doe");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn client_slug_for_unknown_email_is_forbidden() {
    let app = TestApp::spawn().await;
    app.seed_account(Some("Acme & Co.")).await;

    let (status, _) = app
        .post(
            "/portal/client-slug",
            json!({ "email": "stranger@evil.com", "company_slug": "acme-co" }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

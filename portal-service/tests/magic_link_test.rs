//! Magic link issuance integration tests.

mod common;

use common::{token_from_link, TestApp};
use service_core::axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn allowlisted_member_gets_magic_link() {
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
        "editor",
    )
    .await;

    let (status, body) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "jane@globex.com",
                "company_slug": "acme-co",
                "client_slug": "globex"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["email"], "jane@globex.com");
    assert_eq!(body["member"]["name"], "Jane Doe");
    assert_eq!(body["member"]["role"], "editor");

    let link = app.last_magic_link();
    assert!(link.starts_with("http://localhost:3000/acme-co?client=globex&token="));
    assert_eq!(token_from_link(&link).len(), 64);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn email_matching_is_case_insensitive() {
    let app = TestApp::spawn().await;
    let account_id = app.seed_account(Some("Acme & Co.")).await;
    let client_id = app
        .seed_client(account_id, "Greta", "Globex", "greta@globex.com", None)
        .await;
    app.seed_member(
        account_id,
        client_id,
        "acme-co",
        "greta-globex",
        "jane@globex.com",
        "Jane Doe",
        "viewer",
    )
    .await;

    let (status, _) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "Jane@Globex.COM",
                "company_slug": "acme-co",
                "client_slug": "greta-globex"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn unlisted_email_is_forbidden() {
    let app = TestApp::spawn().await;
    let account_id = app.seed_account(Some("Acme & Co.")).await;
    app.seed_client(account_id, "Greta", "Globex", "greta@globex.com", None)
        .await;

    let (status, body) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "stranger@evil.com",
                "company_slug": "acme-co",
                "client_slug": "globex"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("not authorized"));
    assert!(app.email.sent.lock().unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn unknown_company_slug_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "jane@globex.com",
                "company_slug": "no-such-company",
                "client_slug": "globex"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn malformed_email_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "not-an-email",
                "company_slug": "acme-co",
                "client_slug": "globex"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn profile_name_resolves_when_account_has_no_company() {
    let app = TestApp::spawn().await;
    let account_id = app.seed_account(None).await;
    app.seed_profile(account_id, "Jane", "Doe").await;
    let client_id = app
        .seed_client(account_id, "Greta", "Globex", "greta@globex.com", None)
        .await;
    app.seed_member(
        account_id,
        client_id,
        "jane-doe",
        "greta-globex",
        "greta@globex.com",
        "Greta Globex",
        "owner",
    )
    .await;

    let (status, _) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "greta@globex.com",
                "company_slug": "jane-doe",
                "client_slug": "greta-globex"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
}

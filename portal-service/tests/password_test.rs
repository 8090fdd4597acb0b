//! Password fallback integration tests.

mod common;

use common::TestApp;
use portal_service::utils::{hash_password, Password};
use serde_json::json;
use service_core::axum::http::StatusCode;

async fn seed_member(app: &TestApp) {
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
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn setup_then_verify_roundtrip() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    let (status, _) = app
        .post(
            "/portal/setup-password",
            json!({
                "email": "jane@globex.com",
                "password": "correct horse battery",
                "slug": "acme-co"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "jane@globex.com",
                "password": "correct horse battery",
                "slug": "acme-co"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@globex.com");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    app.post(
        "/portal/setup-password",
        json!({
            "email": "jane@globex.com",
            "password": "correct horse battery",
            "slug": "acme-co"
        }),
    )
    .await;

    let (status, _) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "jane@globex.com",
                "password": "wrong password",
                "slug": "acme-co"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn verify_without_setup_points_at_setup() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    let (status, body) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "jane@globex.com",
                "password": "whatever else",
                "slug": "acme-co"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("set up"));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn legacy_hash_verifies_and_stamps_setup_flag() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    // Rows written before the flag existed: hash present, flag never set
    let hash = hash_password(&Password::new("legacy password".to_string())).unwrap();
    sqlx::query(
        "UPDATE client_allowlist SET password_hash = $1, has_password_setup = FALSE \
         WHERE email = 'jane@globex.com'",
    )
    .bind(hash.as_str())
    .execute(app.db.pool())
    .await
    .unwrap();

    let (status, body) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "jane@globex.com",
                "password": "legacy password",
                "slug": "acme-co"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@globex.com");

    let (flag,): (bool,) = sqlx::query_as(
        "SELECT has_password_setup FROM client_allowlist WHERE email = 'jane@globex.com'",
    )
    .fetch_one(app.db.pool())
    .await
    .unwrap();
    assert!(flag);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn verify_for_unlisted_email_is_forbidden() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    let (status, _) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "stranger@evil.com",
                "password": "whatever else",
                "slug": "acme-co"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn unlisted_email_cannot_set_a_password() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    let (status, _) = app
        .post(
            "/portal/setup-password",
            json!({
                "email": "stranger@evil.com",
                "password": "long enough pw",
                "slug": "acme-co"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn short_password_is_rejected() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    let (status, _) = app
        .post(
            "/portal/setup-password",
            json!({
                "email": "jane@globex.com",
                "password": "short",
                "slug": "acme-co"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn setting_a_password_again_replaces_it() {
    let app = TestApp::spawn().await;
    seed_member(&app).await;

    for password in ["first password", "second password"] {
        let (status, _) = app
            .post(
                "/portal/setup-password",
                json!({
                    "email": "jane@globex.com",
                    "password": password,
                    "slug": "acme-co"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "jane@globex.com",
                "password": "first password",
                "slug": "acme-co"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/portal/verify-password",
            json!({
                "email": "jane@globex.com",
                "password": "second password",
                "slug": "acme-co"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

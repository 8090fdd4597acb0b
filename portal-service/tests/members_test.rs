//! Allowlist management integration tests.

mod common;

use common::TestApp;
use serde_json::json;
use service_core::axum::http::StatusCode;
use uuid::Uuid;

async fn seed_portal(app: &TestApp) -> (Uuid, Uuid) {
    let account_id = app.seed_account(Some("Acme & Co.")).await;
    let client_id = app
        .seed_client(account_id, "Greta", "Globex", "greta@globex.com", Some("Globex"))
        .await;
    (account_id, client_id)
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn add_members_skips_invalid_rows() {
    let app = TestApp::spawn().await;
    let (_, client_id) = seed_portal(&app).await;

    let (status, body) = app
        .post(
            "/portal/members",
            json!({
                "company_slug": "acme-co",
                "client_id": client_id,
                "members": [
                    { "email": "jane@globex.com", "name": "Jane Doe", "role": "editor" },
                    { "email": "not-an-email", "name": "Bad Row" },
                    { "email": "empty@globex.com", "name": "   " }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added_count"], 1);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn add_members_with_no_valid_rows_is_bad_request() {
    let app = TestApp::spawn().await;
    let (_, client_id) = seed_portal(&app).await;

    let (status, _) = app
        .post(
            "/portal/members",
            json!({
                "company_slug": "acme-co",
                "client_id": client_id,
                "members": [
                    { "email": "not-an-email", "name": "Bad Row" }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn readding_a_member_reactivates_and_updates() {
    let app = TestApp::spawn().await;
    let (account_id, client_id) = seed_portal(&app).await;
    let member_id = app
        .seed_member(
            account_id,
            client_id,
            "acme-co",
            "globex",
            "jane@globex.com",
            "Jane Doe",
            "viewer",
        )
        .await;
    sqlx::query("UPDATE client_allowlist SET is_active = FALSE WHERE member_id = $1")
        .bind(member_id)
        .execute(app.db.pool())
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/portal/members",
            json!({
                "company_slug": "acme-co",
                "client_id": client_id,
                "members": [
                    { "email": "jane@globex.com", "name": "Jane D.", "role": "admin" }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added_count"], 1);

    let (status, list) = app
        .get(&format!(
            "/portal/clients/{}/members?company_slug=acme-co",
            client_id
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let members = list["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["name"], "Jane D.");
    assert_eq!(members[0]["role"], "admin");
    assert_eq!(members[0]["is_active"], true);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn list_members_flags_the_main_client() {
    let app = TestApp::spawn().await;
    let (account_id, client_id) = seed_portal(&app).await;
    app.seed_member(
        account_id,
        client_id,
        "acme-co",
        "globex",
        "greta@globex.com",
        "Greta Globex",
        "owner",
    )
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
        .get(&format!(
            "/portal/clients/{}/members?company_slug=acme-co",
            client_id
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    for member in body["members"].as_array().unwrap() {
        let is_main = member["email"] == "greta@globex.com";
        assert_eq!(member["is_main_client"], is_main);
    }
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn main_client_cannot_be_removed() {
    let app = TestApp::spawn().await;
    let (account_id, client_id) = seed_portal(&app).await;
    let member_id = app
        .seed_member(
            account_id,
            client_id,
            "acme-co",
            "globex",
            "greta@globex.com",
            "Greta Globex",
            "owner",
        )
        .await;

    let (status, body) = app
        .delete(&format!(
            "/portal/members/{}?company_slug=acme-co",
            member_id
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("main client"));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn removing_a_member_is_a_soft_delete() {
    let app = TestApp::spawn().await;
    let (account_id, client_id) = seed_portal(&app).await;
    let member_id = app
        .seed_member(
            account_id,
            client_id,
            "acme-co",
            "globex",
            "jane@globex.com",
            "Jane Doe",
            "viewer",
        )
        .await;

    let (status, _) = app
        .delete(&format!(
            "/portal/members/{}?company_slug=acme-co",
            member_id
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Row survives but the member can no longer request a link
    let (status, list) = app
        .get(&format!(
            "/portal/clients/{}/members?company_slug=acme-co",
            client_id
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["members"][0]["is_active"], false);

    let (status, _) = app
        .post(
            "/portal/magic-link",
            json!({
                "email": "jane@globex.com",
                "company_slug": "acme-co",
                "client_slug": "globex"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn update_member_role_works() {
    let app = TestApp::spawn().await;
    let (account_id, client_id) = seed_portal(&app).await;
    let member_id = app
        .seed_member(
            account_id,
            client_id,
            "acme-co",
            "globex",
            "jane@globex.com",
            "Jane Doe",
            "viewer",
        )
        .await;

    let (status, _) = app
        .patch(
            &format!("/portal/members/{}", member_id),
            json!({ "company_slug": "acme-co", "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app
        .get(&format!(
            "/portal/clients/{}/members?company_slug=acme-co",
            client_id
        ))
        .await;
    assert_eq!(list["members"][0]["role"], "admin");
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn update_role_for_unknown_member_is_not_found() {
    let app = TestApp::spawn().await;
    seed_portal(&app).await;

    let (status, _) = app
        .patch(
            &format!("/portal/members/{}", Uuid::new_v4()),
            json!({ "company_slug": "acme-co", "role": "admin" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn unknown_role_is_rejected_at_the_boundary() {
    let app = TestApp::spawn().await;
    let (_, client_id) = seed_portal(&app).await;

    let (status, _) = app
        .post(
            "/portal/members",
            json!({
                "company_slug": "acme-co",
                "client_id": client_id,
                "members": [
                    { "email": "jane@globex.com", "name": "Jane Doe", "role": "superuser" }
                ]
            }),
        )
        .await;

    // Closed role enum: unknown values fail deserialization
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

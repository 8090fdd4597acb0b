use service_core::{
    axum::{extract::State, http::StatusCode, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::portal::{SetupPasswordRequest, VerifyPasswordRequest, VerifyPasswordResponse},
    utils::ValidatedJson,
    AppState,
};

/// Set up a fallback password
///
/// Only allowlisted members can set one; setting it again replaces it.
#[utoipa::path(
    post,
    path = "/portal/setup-password",
    request_body = SetupPasswordRequest,
    responses(
        (status = 200, description = "Password configured"),
        (status = 403, description = "Email not on the allowlist", body = ErrorResponse),
        (status = 404, description = "Portal not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Auth"
)]
pub async fn setup_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SetupPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .portal_auth
        .setup_password(&req.email, &req.password, &req.slug)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Password set up successfully"
        })),
    ))
}

/// Verify a fallback password
#[utoipa::path(
    post,
    path = "/portal/verify-password",
    request_body = VerifyPasswordRequest,
    responses(
        (status = 200, description = "Password correct", body = VerifyPasswordResponse),
        (status = 400, description = "Password not set up", body = ErrorResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 403, description = "Email not on the allowlist", body = ErrorResponse),
        (status = 404, description = "Portal not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Auth"
)]
pub async fn verify_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .portal_auth
        .verify_password(&req.email, &req.password, &req.slug)
        .await?;

    Ok((
        StatusCode::OK,
        Json(VerifyPasswordResponse {
            email: member.email,
        }),
    ))
}

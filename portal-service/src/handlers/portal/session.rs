use service_core::{
    axum::{extract::State, http::StatusCode, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::portal::{
        RefreshSessionRequest, SessionIdentityResponse, SessionResponse, ValidateSessionRequest,
        ValidateTokenRequest,
    },
    services::SessionGrant,
    utils::ValidatedJson,
    AppState,
};

fn session_response(grant: SessionGrant) -> SessionResponse {
    SessionResponse {
        email: grant.member.email.clone(),
        name: grant.member.name.clone(),
        role: grant.member.role(),
        session_token: grant.session_token,
        refresh_token: grant.refresh_token,
        expires_at: grant.expires_at,
    }
}

/// Redeem a magic link token for a session
///
/// Tokens stay redeemable until they expire, so opening the link twice works.
#[utoipa::path(
    post,
    path = "/portal/validate-token",
    request_body = ValidateTokenRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Email no longer on the allowlist", body = ErrorResponse),
        (status = 404, description = "Portal not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Auth"
)]
pub async fn validate_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ValidateTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let grant = state
        .portal_auth
        .validate_token(&req.token, &req.company_slug, &req.client_slug)
        .await?;

    Ok((StatusCode::OK, Json(session_response(grant))))
}

/// Validate a session token
///
/// Returns the member's current name and role, re-read from the allowlist.
#[utoipa::path(
    post,
    path = "/portal/validate-session",
    request_body = ValidateSessionRequest,
    responses(
        (status = 200, description = "Session valid", body = SessionIdentityResponse),
        (status = 400, description = "Invalid or expired session", body = ErrorResponse),
        (status = 403, description = "Member deactivated", body = ErrorResponse),
        (status = 404, description = "Portal not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Auth"
)]
pub async fn validate_session(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ValidateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .portal_auth
        .validate_session(&req.session_token, &req.company_slug, &req.client_slug)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SessionIdentityResponse {
            email: member.email.clone(),
            name: member.name.clone(),
            role: member.role(),
            company_slug: member.company_slug,
            client_slug: member.client_slug,
        }),
    ))
}

/// Exchange a refresh token for a new session
#[utoipa::path(
    post,
    path = "/portal/refresh-session",
    request_body = RefreshSessionRequest,
    responses(
        (status = 200, description = "New session created", body = SessionResponse),
        (status = 400, description = "Invalid or expired refresh token", body = ErrorResponse),
        (status = 403, description = "Member deactivated", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Auth"
)]
pub async fn refresh_session(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let grant = state.portal_auth.refresh_session(&req.refresh_token).await?;

    Ok((StatusCode::OK, Json(session_response(grant))))
}

use service_core::{
    axum::{extract::State, http::StatusCode, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::portal::{
        CheckPortalRequest, CheckPortalResponse, ClientSlugRequest, MemberLocationResponse,
    },
    utils::ValidatedJson,
    AppState,
};

/// Check whether a portal exists for a slug
#[utoipa::path(
    post,
    path = "/portal/check",
    request_body = CheckPortalRequest,
    responses(
        (status = 200, description = "Lookup result", body = CheckPortalResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Lookup"
)]
pub async fn check_portal(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CheckPortalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (exists, display_name) = state.portal_auth.check_portal_exists(&req.slug).await?;

    Ok((
        StatusCode::OK,
        Json(CheckPortalResponse {
            exists,
            display_name,
        }),
    ))
}

/// Locate the client portal an email belongs to
///
/// Used by the frontend to redirect a member who landed on the company URL.
#[utoipa::path(
    post,
    path = "/portal/client-slug",
    request_body = ClientSlugRequest,
    responses(
        (status = 200, description = "Member located", body = MemberLocationResponse),
        (status = 403, description = "Email not on the allowlist", body = ErrorResponse),
        (status = 404, description = "Portal not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Lookup"
)]
pub async fn client_slug(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ClientSlugRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .portal_auth
        .get_client_slug(&req.email, &req.company_slug)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MemberLocationResponse {
            email: member.email.clone(),
            name: member.name.clone(),
            role: member.role(),
            company_slug: member.company_slug,
            client_slug: member.client_slug,
        }),
    ))
}

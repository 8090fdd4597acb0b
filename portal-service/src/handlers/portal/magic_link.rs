use service_core::{
    axum::{extract::State, http::StatusCode, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::portal::{MagicLinkRequest, MagicLinkResponse, MemberIdentity},
    utils::ValidatedJson,
    AppState,
};

/// Request a magic sign-in link
///
/// The link is emailed to the address if it is on the portal's allowlist.
/// Delivery is best-effort: the response does not reveal whether the email
/// actually went out.
#[utoipa::path(
    post,
    path = "/portal/magic-link",
    request_body = MagicLinkRequest,
    responses(
        (status = 200, description = "Magic link issued", body = MagicLinkResponse),
        (status = 403, description = "Email not on the allowlist", body = ErrorResponse),
        (status = 404, description = "Portal not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Auth"
)]
pub async fn send_magic_link(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<MagicLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .portal_auth
        .issue_magic_link(&req.email, &req.company_slug, &req.client_slug)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MagicLinkResponse {
            message: "Magic link sent to your email".to_string(),
            member: MemberIdentity {
                email: member.email.clone(),
                name: member.name.clone(),
                role: member.role(),
            },
        }),
    ))
}

use service_core::{
    axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
        Json,
    },
    error::AppError,
};
use uuid::Uuid;

use crate::{
    dtos::portal::{
        AddMembersRequest, AddMembersResponse, MemberScopeQuery, MemberSummary,
        MembersListResponse, UpdateMemberRoleRequest,
    },
    utils::ValidatedJson,
    AppState,
};

/// Add members to a client's allowlist
///
/// Rows with a bad email or empty name are skipped; the count reflects what
/// was actually written. Re-adding an existing email refreshes its name and
/// role and reactivates it.
#[utoipa::path(
    post,
    path = "/portal/members",
    request_body = AddMembersRequest,
    responses(
        (status = 200, description = "Members added", body = AddMembersResponse),
        (status = 400, description = "No valid members in the batch", body = ErrorResponse),
        (status = 404, description = "Portal or client not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Members"
)]
pub async fn add_members(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AddMembersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let added_count = state
        .allowlist
        .add_members(&req.company_slug, req.client_id, req.members)
        .await?;

    Ok((StatusCode::OK, Json(AddMembersResponse { added_count })))
}

/// List a client's allowlist members
#[utoipa::path(
    get,
    path = "/portal/clients/{client_id}/members",
    params(
        ("client_id" = Uuid, Path, description = "Client id"),
        MemberScopeQuery
    ),
    responses(
        (status = 200, description = "Member list", body = MembersListResponse),
        (status = 404, description = "Portal or client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Members"
)]
pub async fn list_members(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Query(scope): Query<MemberScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (client, members) = state
        .allowlist
        .list_members(&scope.company_slug, client_id)
        .await?;

    let members: Vec<MemberSummary> = members
        .into_iter()
        .map(|m| MemberSummary {
            member_id: m.member_id,
            email: m.email.clone(),
            name: m.name.clone(),
            role: m.role(),
            is_active: m.is_active,
            is_main_client: m.is_main_client(&client.email),
            created_utc: m.created_utc,
        })
        .collect();

    let total_count = members.len();
    Ok((
        StatusCode::OK,
        Json(MembersListResponse {
            members,
            total_count,
        }),
    ))
}

/// Change a member's role
#[utoipa::path(
    patch,
    path = "/portal/members/{member_id}",
    params(("member_id" = Uuid, Path, description = "Member id")),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Role updated"),
        (status = 404, description = "Portal or member not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Members"
)]
pub async fn update_member_role(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateMemberRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .allowlist
        .update_member_role(&req.company_slug, member_id, req.role)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Member role updated"
        })),
    ))
}

/// Remove a member from the allowlist
///
/// Soft delete: the row is kept with is_active = false. The main client
/// contact cannot be removed.
#[utoipa::path(
    delete,
    path = "/portal/members/{member_id}",
    params(
        ("member_id" = Uuid, Path, description = "Member id"),
        MemberScopeQuery
    ),
    responses(
        (status = 200, description = "Member removed"),
        (status = 403, description = "Member is the main client", body = ErrorResponse),
        (status = 404, description = "Portal or member not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Portal Members"
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    Query(scope): Query<MemberScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    state
        .allowlist
        .remove_member(&scope.company_slug, member_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Member removed from portal"
        })),
    ))
}

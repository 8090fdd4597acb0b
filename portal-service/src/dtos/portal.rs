use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::MemberRole;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MagicLinkRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@client.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Company slug is required"))]
    #[schema(example = "acme-co")]
    pub company_slug: String,

    #[validate(length(min = 1, message = "Client slug is required"))]
    #[schema(example = "globex")]
    pub client_slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MagicLinkResponse {
    #[schema(example = "Magic link sent to your email")]
    pub message: String,
    pub member: MemberIdentity,
}

/// Current allowlist identity, always re-read from the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberIdentity {
    #[schema(example = "jane@client.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: MemberRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidateTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    #[schema(example = "a1b2c3d4e5f6...")]
    pub token: String,

    #[validate(length(min = 1, message = "Company slug is required"))]
    #[schema(example = "acme-co")]
    pub company_slug: String,

    #[validate(length(min = 1, message = "Client slug is required"))]
    #[schema(example = "globex")]
    pub client_slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = "jane@client.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: MemberRole,
    #[schema(example = "f3a9...")]
    pub session_token: String,
    #[schema(example = "0c77...")]
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidateSessionRequest {
    #[validate(length(min = 1, message = "Session token is required"))]
    pub session_token: String,

    #[validate(length(min = 1, message = "Company slug is required"))]
    #[schema(example = "acme-co")]
    pub company_slug: String,

    #[validate(length(min = 1, message = "Client slug is required"))]
    #[schema(example = "globex")]
    pub client_slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionIdentityResponse {
    #[schema(example = "jane@client.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: MemberRole,
    #[schema(example = "acme-co")]
    pub company_slug: String,
    #[schema(example = "globex")]
    pub client_slug: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshSessionRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetupPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@client.com")]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "password123", min_length = 8)]
    pub password: String,

    #[validate(length(min = 1, message = "Slug is required"))]
    #[schema(example = "acme-co")]
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@client.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, message = "Slug is required"))]
    #[schema(example = "acme-co")]
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPasswordResponse {
    #[schema(example = "jane@client.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckPortalRequest {
    #[validate(length(min = 1, message = "Slug is required"))]
    #[schema(example = "acme-co")]
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckPortalResponse {
    #[schema(example = true)]
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Acme & Co.")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClientSlugRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@client.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Company slug is required"))]
    #[schema(example = "acme-co")]
    pub company_slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberLocationResponse {
    #[schema(example = "jane@client.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: MemberRole,
    #[schema(example = "acme-co")]
    pub company_slug: String,
    #[schema(example = "globex")]
    pub client_slug: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewMember {
    #[schema(example = "jane@client.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: Option<MemberRole>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMembersRequest {
    #[validate(length(min = 1, message = "Company slug is required"))]
    #[schema(example = "acme-co")]
    pub company_slug: String,

    pub client_id: Uuid,

    #[validate(length(min = 1, message = "At least one member is required"))]
    pub members: Vec<NewMember>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddMembersResponse {
    #[schema(example = 2)]
    pub added_count: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRoleRequest {
    #[validate(length(min = 1, message = "Company slug is required"))]
    #[schema(example = "acme-co")]
    pub company_slug: String,

    pub role: MemberRole,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct MemberScopeQuery {
    pub company_slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberSummary {
    pub member_id: Uuid,
    #[schema(example = "jane@client.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: MemberRole,
    pub is_active: bool,
    pub is_main_client: bool,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembersListResponse {
    pub members: Vec<MemberSummary>,
    #[schema(example = 3)]
    pub total_count: usize,
}

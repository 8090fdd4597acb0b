//! Allowlist member model - the authorization record for a portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Portal member roles. Stored as text; validated at the API boundary so
/// arbitrary strings never reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Editor,
    Viewer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Editor => "editor",
            MemberRole::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(MemberRole::Owner),
            "admin" => Ok(MemberRole::Admin),
            "editor" => Ok(MemberRole::Editor),
            "viewer" => Ok(MemberRole::Viewer),
            _ => Err(format!("Invalid member role: {}", s)),
        }
    }
}

/// Allowlist entry binding an email to an account (and client portal) with a
/// role, an active flag, and an optional password hash for the fallback
/// login path. Unique on (account_id, client_slug, email).
#[derive(Debug, Clone, FromRow)]
pub struct AllowlistMember {
    pub member_id: Uuid,
    pub account_id: Uuid,
    pub client_id: Uuid,
    pub company_slug: String,
    pub client_slug: String,
    pub email: String,
    pub name: String,
    pub role_code: String,
    pub is_active: bool,
    pub password_hash: Option<String>,
    pub has_password_setup: bool,
    pub created_utc: DateTime<Utc>,
}

impl AllowlistMember {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: Uuid,
        client_id: Uuid,
        company_slug: String,
        client_slug: String,
        email: String,
        name: String,
        role: MemberRole,
    ) -> Self {
        Self {
            member_id: Uuid::new_v4(),
            account_id,
            client_id,
            company_slug,
            client_slug,
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            role_code: role.as_str().to_string(),
            is_active: true,
            password_hash: None,
            has_password_setup: false,
            created_utc: Utc::now(),
        }
    }

    /// Parse the stored role, defaulting to viewer for rows written before
    /// the role column was constrained.
    pub fn role(&self) -> MemberRole {
        self.role_code.parse().unwrap_or(MemberRole::Viewer)
    }

    /// The main client contact (email equal to the owning client's email) is
    /// protected from removal.
    pub fn is_main_client(&self, client_email: &str) -> bool {
        self.email.eq_ignore_ascii_case(client_email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(email: &str) -> AllowlistMember {
        AllowlistMember::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "acme-co".to_string(),
            "clienta".to_string(),
            email.to_string(),
            "A Person".to_string(),
            MemberRole::Viewer,
        )
    }

    #[test]
    fn email_is_normalized_on_construction() {
        assert_eq!(member(" Jane@Example.COM ").email, "jane@example.com");
    }

    #[test]
    fn role_round_trip() {
        for role in [
            MemberRole::Owner,
            MemberRole::Admin,
            MemberRole::Editor,
            MemberRole::Viewer,
        ] {
            assert_eq!(role.as_str().parse::<MemberRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_stored_role_falls_back_to_viewer() {
        let mut m = member("a@x.com");
        m.role_code = "superuser".to_string();
        assert_eq!(m.role(), MemberRole::Viewer);
    }

    #[test]
    fn main_client_detection_is_case_insensitive() {
        let m = member("owner@client.com");
        assert!(m.is_main_client("Owner@Client.com"));
        assert!(!m.is_main_client("other@client.com"));
    }
}

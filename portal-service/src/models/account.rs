//! Account and profile models - tenant roots owned by the main application.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Tenant root. `company_name` is free text; the portal slug is derived from
/// it at lookup time and never stored.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub company_name: Option<String>,
    pub plan_tier: String,
    pub created_utc: DateTime<Utc>,
}

/// Account owner's profile, used as the slug fallback when the account has no
/// company name.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub profile_id: Uuid,
    pub account_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }
}

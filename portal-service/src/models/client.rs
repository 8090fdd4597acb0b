//! Client model - a customer of an account.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Client entity. Its email identifies the "main client" allowlist entry,
/// which can never be deactivated.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub client_id: Uuid,
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Name the client's portal slug is derived from: the client company if
    /// present, otherwise the contact's full name.
    pub fn slug_source(&self) -> String {
        match &self.company {
            Some(company) if !company.trim().is_empty() => company.clone(),
            _ => self.full_name(),
        }
    }
}

//! Client session model - portal sessions independent of the main
//! application's auth provider.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Portal session entity. Tokens are opaque random strings stored as SHA-256
/// hashes; validity is decided solely by this row, so the store must be
/// consulted on every request. Name and role are never cached here - they
/// are re-read from the allowlist at validation time.
#[derive(Debug, Clone, FromRow)]
pub struct ClientSession {
    pub session_id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub session_token_hash: String,
    pub refresh_token_hash: String,
    pub expiry_utc: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
}

impl ClientSession {
    /// Create a session expiring a fixed `ttl_hours` from now.
    pub fn new(
        account_id: Uuid,
        email: String,
        session_token_hash: String,
        refresh_token_hash: String,
        ttl_hours: i64,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            account_id,
            email: email.trim().to_lowercase(),
            session_token_hash,
            refresh_token_hash,
            expiry_utc: Utc::now() + Duration::hours(ttl_hours),
            created_utc: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry_utc
    }
}

//! Magic link token model - short-lived passwordless login credentials.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Magic link token entity. Only the SHA-256 hash of the raw token is
/// stored. Tokens stay redeemable until expiry: `used_utc` records first use
/// for support tooling but has no bearing on validity.
#[derive(Debug, Clone, FromRow)]
pub struct MagicLinkToken {
    pub token_id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub client_slug: String,
    pub token_hash: String,
    pub expiry_utc: DateTime<Utc>,
    pub used_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl MagicLinkToken {
    pub fn new(
        account_id: Uuid,
        email: String,
        client_slug: String,
        token_hash: String,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            token_id: Uuid::new_v4(),
            account_id,
            email: email.trim().to_lowercase(),
            client_slug,
            token_hash,
            expiry_utc: Utc::now() + Duration::minutes(ttl_minutes),
            used_utc: None,
            created_utc: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry_utc
    }
}

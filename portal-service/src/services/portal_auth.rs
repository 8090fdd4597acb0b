//! Passwordless portal authentication: magic link issuance and redemption,
//! session validation and refresh, and the password fallback path.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{AllowlistMember, ClientSession, MagicLinkToken};
use crate::utils::password::{hash_password, verify_password, Password, PasswordHashString};
use crate::utils::token::{generate_token, hash_token};

use super::{Database, EmailProvider, ServiceError, SlugResolver};

/// A freshly minted session with its raw (unhashed) tokens. The raw tokens
/// exist only in this value and the response that carries it.
pub struct SessionGrant {
    pub member: AllowlistMember,
    pub session_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PortalAuthService {
    db: Database,
    resolver: SlugResolver,
    email: Arc<dyn EmailProvider>,
    portal_base_url: String,
    magic_link_ttl_minutes: i64,
    session_ttl_hours: i64,
}

impl PortalAuthService {
    pub fn new(
        db: Database,
        resolver: SlugResolver,
        email: Arc<dyn EmailProvider>,
        portal_base_url: String,
        magic_link_ttl_minutes: i64,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            db,
            resolver,
            email,
            portal_base_url,
            magic_link_ttl_minutes,
            session_ttl_hours,
        }
    }

    /// Issue a magic link for an allowlisted email and send it.
    ///
    /// Email delivery is best-effort: a send failure is logged but does not
    /// fail the request, so the caller cannot distinguish it from success.
    /// The raw token is never stored; only its hash is.
    pub async fn issue_magic_link(
        &self,
        email: &str,
        company_slug: &str,
        client_slug: &str,
    ) -> Result<AllowlistMember, ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;

        let member = self
            .db
            .find_active_member_for_portal(account_id, email, company_slug, client_slug)
            .await?
            .ok_or(ServiceError::NotAllowed)?;

        let raw_token = generate_token();
        let token = MagicLinkToken::new(
            account_id,
            member.email.clone(),
            client_slug.to_string(),
            hash_token(&raw_token),
            self.magic_link_ttl_minutes,
        );
        self.db.insert_magic_link_token(&token).await?;

        let magic_link = format!(
            "{}/{}?client={}&token={}",
            self.portal_base_url.trim_end_matches('/'),
            company_slug,
            client_slug,
            raw_token
        );

        let company_name = self
            .db
            .find_account_display_name(account_id)
            .await?
            .unwrap_or_else(|| company_slug.to_string());

        if let Err(e) = self
            .email
            .send_magic_link_email(&member.email, &member.name, &company_name, &magic_link)
            .await
        {
            tracing::error!(
                error = %e,
                email = %member.email,
                "Magic link email delivery failed; token remains valid"
            );
        }

        tracing::info!(
            account_id = %account_id,
            client_slug = %client_slug,
            "Magic link issued"
        );

        Ok(member)
    }

    /// Redeem a magic link token and mint a session.
    ///
    /// Tokens stay redeemable until expiry regardless of prior use; the
    /// first redemption stamps `used_utc` for support tooling only. The
    /// allowlist is re-checked here, so revoking a member between issue and
    /// redeem denies entry.
    pub async fn validate_token(
        &self,
        raw_token: &str,
        company_slug: &str,
        client_slug: &str,
    ) -> Result<SessionGrant, ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;

        let token = self
            .db
            .find_magic_link_token(account_id, &hash_token(raw_token), client_slug)
            .await?
            .ok_or(ServiceError::TokenInvalid)?;

        if token.is_expired() {
            return Err(ServiceError::TokenExpired);
        }

        let member = self
            .db
            .find_active_member_for_portal(account_id, &token.email, company_slug, client_slug)
            .await?
            .ok_or(ServiceError::NotAllowed)?;

        self.db.mark_token_used(token.token_id).await?;

        self.mint_session(account_id, member).await
    }

    /// Validate a session token against the store and return the member's
    /// current identity. Name and role are re-read from the allowlist on
    /// every call, so role changes apply to live sessions immediately.
    pub async fn validate_session(
        &self,
        session_token: &str,
        company_slug: &str,
        client_slug: &str,
    ) -> Result<AllowlistMember, ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;

        let session = self
            .db
            .find_session_by_token(account_id, &hash_token(session_token))
            .await?
            .ok_or(ServiceError::SessionInvalid)?;

        if session.is_expired() {
            return Err(ServiceError::SessionExpired);
        }

        self.db
            .find_active_member_exact(account_id, &session.email, company_slug, client_slug)
            .await?
            .ok_or(ServiceError::NotAllowed)
    }

    /// Exchange a refresh token for a brand-new session. The refresh token
    /// expires with its session, so this extends a live session but cannot
    /// revive a dead one.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<SessionGrant, ServiceError> {
        let session = self
            .db
            .find_session_by_refresh(&hash_token(refresh_token))
            .await?
            .ok_or(ServiceError::SessionInvalid)?;

        if session.is_expired() {
            return Err(ServiceError::SessionExpired);
        }

        let member = self
            .db
            .find_active_member(session.account_id, &session.email)
            .await?
            .ok_or(ServiceError::NotAllowed)?;

        self.mint_session(session.account_id, member).await
    }

    /// Set (or replace) a member's fallback password.
    pub async fn setup_password(
        &self,
        email: &str,
        password: &str,
        slug: &str,
    ) -> Result<(), ServiceError> {
        let account_id = self.resolver.resolve_account(slug).await?;

        let member = self
            .db
            .find_active_member(account_id, email)
            .await?
            .ok_or(ServiceError::NotAllowed)?;

        let hash = hash_password(&Password::new(password.to_string()))?;
        self.db
            .set_member_password(member.member_id, hash.as_str())
            .await?;

        tracing::info!(member_id = %member.member_id, "Portal password configured");
        Ok(())
    }

    /// Verify a fallback password. Unlisted emails are refused outright;
    /// a member who never set a password gets a distinct error pointing
    /// them at setup. Only hash presence gates verification: legacy rows
    /// carrying a hash without the setup flag still verify, and the flag is
    /// stamped on the first success.
    pub async fn verify_password(
        &self,
        email: &str,
        password: &str,
        slug: &str,
    ) -> Result<AllowlistMember, ServiceError> {
        let account_id = self.resolver.resolve_account(slug).await?;

        let member = self
            .db
            .find_active_member(account_id, email)
            .await?
            .ok_or(ServiceError::NotAllowed)?;

        let stored = match &member.password_hash {
            Some(hash) => PasswordHashString::new(hash.clone()),
            None => return Err(ServiceError::PasswordNotConfigured),
        };

        verify_password(&Password::new(password.to_string()), &stored)
            .map_err(|_| ServiceError::InvalidCredentials)?;

        if !member.has_password_setup {
            self.db.mark_password_setup(member.member_id).await?;
        }

        Ok(member)
    }

    /// Whether any account's derived slug matches, plus the display name the
    /// slug came from. Used by the portal frontend before rendering a login
    /// page.
    pub async fn check_portal_exists(
        &self,
        slug: &str,
    ) -> Result<(bool, Option<String>), ServiceError> {
        match self.resolver.try_resolve_account(slug).await? {
            Some(account_id) => {
                let display_name = self.db.find_account_display_name(account_id).await?;
                Ok((true, display_name))
            }
            None => Ok((false, None)),
        }
    }

    /// Locate the client portal an email belongs to under a company. Lets
    /// the frontend redirect a member who only knows the company URL.
    pub async fn get_client_slug(
        &self,
        email: &str,
        company_slug: &str,
    ) -> Result<AllowlistMember, ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;

        self.db
            .find_active_member(account_id, email)
            .await?
            .ok_or(ServiceError::NotAllowed)
    }

    async fn mint_session(
        &self,
        account_id: Uuid,
        member: AllowlistMember,
    ) -> Result<SessionGrant, ServiceError> {
        let session_token = generate_token();
        let refresh_token = generate_token();

        let session = ClientSession::new(
            account_id,
            member.email.clone(),
            hash_token(&session_token),
            hash_token(&refresh_token),
            self.session_ttl_hours,
        );
        self.db.insert_session(&session).await?;

        Ok(SessionGrant {
            member,
            session_token,
            refresh_token,
            expires_at: session.expiry_utc,
        })
    }
}

//! PostgreSQL data access for the portal service.
//!
//! One long-lived pool shared by every component; all allowlist, token, and
//! session queries are scoped by account id so cross-tenant reads are
//! impossible to express.

use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{Account, AllowlistMember, Client, ClientSession, MagicLinkToken, Profile};

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== Slug candidates ====================

    /// All accounts, oldest first. Slugs are recomputed over these at lookup
    /// time; the stable ordering makes slug collisions resolve to the oldest
    /// account.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_utc")
            .fetch_all(&self.pool)
            .await
    }

    /// All profiles, oldest first. Fallback slug candidates for accounts
    /// without a company name.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_utc")
            .fetch_all(&self.pool)
            .await
    }

    /// Display name for an account: its company name, falling back to the
    /// owner's profile name.
    pub async fn find_account_display_name(
        &self,
        account_id: Uuid,
    ) -> Result<Option<String>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        match account {
            Some(Account {
                company_name: Some(name),
                ..
            }) => Ok(Some(name)),
            Some(_) => {
                let profile = sqlx::query_as::<_, Profile>(
                    "SELECT * FROM profiles WHERE account_id = $1 ORDER BY created_utc LIMIT 1",
                )
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
                Ok(profile.map(|p| p.full_name()))
            }
            None => Ok(None),
        }
    }

    // ==================== Client Operations ====================

    /// Find a client scoped to its owning account.
    pub async fn find_client_in_account(
        &self,
        client_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE client_id = $1 AND account_id = $2",
        )
        .bind(client_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    // ==================== Allowlist Operations ====================

    /// Active entry for an email within an account, matching either the
    /// requested company portal or the specific client portal.
    pub async fn find_active_member_for_portal(
        &self,
        account_id: Uuid,
        email: &str,
        company_slug: &str,
        client_slug: &str,
    ) -> Result<Option<AllowlistMember>, sqlx::Error> {
        sqlx::query_as::<_, AllowlistMember>(
            "SELECT * FROM client_allowlist \
             WHERE account_id = $1 AND email = LOWER($2) AND is_active \
               AND (company_slug = $3 OR client_slug = $4) \
             ORDER BY created_utc LIMIT 1",
        )
        .bind(account_id)
        .bind(email)
        .bind(company_slug)
        .bind(client_slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// Active entry for an email on exactly this company and client portal.
    /// Session validation uses this stricter match.
    pub async fn find_active_member_exact(
        &self,
        account_id: Uuid,
        email: &str,
        company_slug: &str,
        client_slug: &str,
    ) -> Result<Option<AllowlistMember>, sqlx::Error> {
        sqlx::query_as::<_, AllowlistMember>(
            "SELECT * FROM client_allowlist \
             WHERE account_id = $1 AND email = LOWER($2) AND is_active \
               AND company_slug = $3 AND client_slug = $4 \
             ORDER BY created_utc LIMIT 1",
        )
        .bind(account_id)
        .bind(email)
        .bind(company_slug)
        .bind(client_slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// Active entry for an email within an account, any portal. Used by the
    /// password fallback path where only the account slug is known.
    pub async fn find_active_member(
        &self,
        account_id: Uuid,
        email: &str,
    ) -> Result<Option<AllowlistMember>, sqlx::Error> {
        sqlx::query_as::<_, AllowlistMember>(
            "SELECT * FROM client_allowlist \
             WHERE account_id = $1 AND email = LOWER($2) AND is_active \
             ORDER BY created_utc LIMIT 1",
        )
        .bind(account_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_member_by_id(
        &self,
        account_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<AllowlistMember>, sqlx::Error> {
        sqlx::query_as::<_, AllowlistMember>(
            "SELECT * FROM client_allowlist WHERE member_id = $1 AND account_id = $2",
        )
        .bind(member_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_members_for_client(
        &self,
        account_id: Uuid,
        client_id: Uuid,
    ) -> Result<Vec<AllowlistMember>, sqlx::Error> {
        sqlx::query_as::<_, AllowlistMember>(
            "SELECT * FROM client_allowlist \
             WHERE account_id = $1 AND client_id = $2 \
             ORDER BY created_utc",
        )
        .bind(account_id)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert or refresh a member. Duplicates on (account_id, client_slug,
    /// email) update name and role and reactivate the entry rather than
    /// erroring, so repeated invites are idempotent.
    pub async fn upsert_member(&self, member: &AllowlistMember) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO client_allowlist
                (member_id, account_id, client_id, company_slug, client_slug,
                 email, name, role_code, is_active, password_hash,
                 has_password_setup, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (account_id, client_slug, email)
            DO UPDATE SET name = EXCLUDED.name,
                          role_code = EXCLUDED.role_code,
                          is_active = TRUE
            "#,
        )
        .bind(member.member_id)
        .bind(member.account_id)
        .bind(member.client_id)
        .bind(&member.company_slug)
        .bind(&member.client_slug)
        .bind(&member.email)
        .bind(&member.name)
        .bind(&member.role_code)
        .bind(member.is_active)
        .bind(&member.password_hash)
        .bind(member.has_password_setup)
        .bind(member.created_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Soft delete: the row survives with is_active = false.
    pub async fn deactivate_member(
        &self,
        account_id: Uuid,
        member_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE client_allowlist SET is_active = FALSE \
             WHERE member_id = $1 AND account_id = $2",
        )
        .bind(member_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_member_role(
        &self,
        account_id: Uuid,
        member_id: Uuid,
        role_code: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE client_allowlist SET role_code = $3 \
             WHERE member_id = $1 AND account_id = $2",
        )
        .bind(member_id)
        .bind(account_id)
        .bind(role_code)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_member_password(
        &self,
        member_id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE client_allowlist \
             SET password_hash = $2, has_password_setup = TRUE \
             WHERE member_id = $1",
        )
        .bind(member_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_password_setup(&self, member_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE client_allowlist SET has_password_setup = TRUE WHERE member_id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== Magic Link Token Operations ====================

    pub async fn insert_magic_link_token(
        &self,
        token: &MagicLinkToken,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO magic_link_tokens
                (token_id, account_id, email, client_slug, token_hash,
                 expiry_utc, used_utc, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(token.token_id)
        .bind(token.account_id)
        .bind(&token.email)
        .bind(&token.client_slug)
        .bind(&token.token_hash)
        .bind(token.expiry_utc)
        .bind(token.used_utc)
        .bind(token.created_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_magic_link_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        client_slug: &str,
    ) -> Result<Option<MagicLinkToken>, sqlx::Error> {
        sqlx::query_as::<_, MagicLinkToken>(
            "SELECT * FROM magic_link_tokens \
             WHERE account_id = $1 AND token_hash = $2 AND client_slug = $3",
        )
        .bind(account_id)
        .bind(token_hash)
        .bind(client_slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// Stamp first use. Informational only: tokens stay redeemable until
    /// expiry, so this never gates validation.
    pub async fn mark_token_used(&self, token_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE magic_link_tokens SET used_utc = now() \
             WHERE token_id = $1 AND used_utc IS NULL",
        )
        .bind(token_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ==================== Client Session Operations ====================

    pub async fn insert_session(&self, session: &ClientSession) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO client_sessions
                (session_id, account_id, email, session_token_hash,
                 refresh_token_hash, expiry_utc, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.session_id)
        .bind(session.account_id)
        .bind(&session.email)
        .bind(&session.session_token_hash)
        .bind(&session.refresh_token_hash)
        .bind(session.expiry_utc)
        .bind(session.created_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_session_by_token(
        &self,
        account_id: Uuid,
        session_token_hash: &str,
    ) -> Result<Option<ClientSession>, sqlx::Error> {
        sqlx::query_as::<_, ClientSession>(
            "SELECT * FROM client_sessions \
             WHERE account_id = $1 AND session_token_hash = $2",
        )
        .bind(account_id)
        .bind(session_token_hash)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_session_by_refresh(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<ClientSession>, sqlx::Error> {
        sqlx::query_as::<_, ClientSession>(
            "SELECT * FROM client_sessions WHERE refresh_token_hash = $1",
        )
        .bind(refresh_token_hash)
        .fetch_optional(&self.pool)
        .await
    }
}

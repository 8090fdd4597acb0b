//! Allowlist management: who may enter which portal, and as what.

use uuid::Uuid;
use validator::ValidateEmail;

use crate::dtos::portal::NewMember;
use crate::models::{AllowlistMember, Client, MemberRole};

use super::slug::normalize_slug;
use super::{Database, ServiceError, SlugResolver};

#[derive(Clone)]
pub struct AllowlistService {
    db: Database,
    resolver: SlugResolver,
}

impl AllowlistService {
    pub fn new(db: Database, resolver: SlugResolver) -> Self {
        Self { db, resolver }
    }

    /// Add members to a client's portal. Rows with a malformed email or an
    /// empty name are skipped rather than failing the batch; duplicates are
    /// refreshed and reactivated. Returns how many entries were written.
    pub async fn add_members(
        &self,
        company_slug: &str,
        client_id: Uuid,
        members: Vec<NewMember>,
    ) -> Result<usize, ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;
        let client = self
            .db
            .find_client_in_account(client_id, account_id)
            .await?
            .ok_or(ServiceError::ClientNotFound)?;

        let company_slug = normalize_slug(company_slug);
        let client_slug = normalize_slug(&client.slug_source());

        let valid: Vec<NewMember> = members
            .into_iter()
            .filter(|m| m.email.trim().validate_email() && !m.name.trim().is_empty())
            .collect();

        if valid.is_empty() {
            return Err(ServiceError::NoValidMembers);
        }

        let mut added = 0;
        for new_member in valid {
            let member = AllowlistMember::new(
                account_id,
                client_id,
                company_slug.clone(),
                client_slug.clone(),
                new_member.email,
                new_member.name,
                new_member.role.unwrap_or(MemberRole::Viewer),
            );
            self.db.upsert_member(&member).await?;
            added += 1;
        }

        tracing::info!(
            client_id = %client_id,
            added_count = added,
            "Allowlist members added"
        );

        Ok(added)
    }

    /// List every allowlist entry for a client, active and inactive, with
    /// the owning client so callers can flag the main contact.
    pub async fn list_members(
        &self,
        company_slug: &str,
        client_id: Uuid,
    ) -> Result<(Client, Vec<AllowlistMember>), ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;
        let client = self
            .db
            .find_client_in_account(client_id, account_id)
            .await?
            .ok_or(ServiceError::ClientNotFound)?;

        let members = self.db.list_members_for_client(account_id, client_id).await?;
        Ok((client, members))
    }

    /// Soft-delete a member. The main client contact (allowlist email equal
    /// to the client record's email) can never be removed.
    pub async fn remove_member(
        &self,
        company_slug: &str,
        member_id: Uuid,
    ) -> Result<(), ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;
        let member = self
            .db
            .find_member_by_id(account_id, member_id)
            .await?
            .ok_or(ServiceError::MemberNotFound)?;

        let client = self
            .db
            .find_client_in_account(member.client_id, account_id)
            .await?
            .ok_or(ServiceError::ClientNotFound)?;

        if member.is_main_client(&client.email) {
            return Err(ServiceError::ProtectedMember);
        }

        self.db.deactivate_member(account_id, member_id).await?;

        tracing::info!(member_id = %member_id, "Allowlist member deactivated");
        Ok(())
    }

    pub async fn update_member_role(
        &self,
        company_slug: &str,
        member_id: Uuid,
        role: MemberRole,
    ) -> Result<(), ServiceError> {
        let account_id = self.resolver.resolve_account(company_slug).await?;
        let updated = self
            .db
            .update_member_role(account_id, member_id, role.as_str())
            .await?;

        if updated == 0 {
            return Err(ServiceError::MemberNotFound);
        }

        tracing::info!(member_id = %member_id, role = role.as_str(), "Member role updated");
        Ok(())
    }
}

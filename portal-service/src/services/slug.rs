//! Portal slug derivation and resolution.
//!
//! Slugs are never stored. They are recomputed from account and profile
//! names at lookup time, so renaming a company silently changes its portal
//! URL. Candidates are scanned oldest-first, which makes slug collisions
//! resolve deterministically to the oldest account.

use uuid::Uuid;

use super::{Database, ServiceError};

/// Derive a URL slug from a display name.
///
/// Lowercase, drop everything but letters, digits, whitespace and hyphens,
/// turn whitespace runs into single hyphens, collapse hyphen runs, and trim
/// leading/trailing hyphens. Idempotent: normalizing a slug yields itself.
pub fn normalize_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' => cleaned.push(c),
            c if c.is_whitespace() => cleaned.push('-'),
            _ => {}
        }
    }
    let mut slug = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

/// Resolves company slugs to account ids.
#[derive(Clone)]
pub struct SlugResolver {
    db: Database,
}

impl SlugResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find the account whose derived slug matches. Company names are
    /// checked first; accounts without one fall back to the owner's profile
    /// name.
    pub async fn try_resolve_account(&self, slug: &str) -> Result<Option<Uuid>, ServiceError> {
        for account in self.db.list_accounts().await? {
            if let Some(name) = &account.company_name {
                if normalize_slug(name) == slug {
                    return Ok(Some(account.account_id));
                }
            }
        }

        for profile in self.db.list_profiles().await? {
            if normalize_slug(&profile.full_name()) == slug {
                return Ok(Some(profile.account_id));
            }
        }

        Ok(None)
    }

    /// As [`try_resolve_account`](Self::try_resolve_account), but an
    /// unmatched slug is an error.
    pub async fn resolve_account(&self, slug: &str) -> Result<Uuid, ServiceError> {
        self.try_resolve_account(slug)
            .await?
            .ok_or(ServiceError::AccountNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(normalize_slug("Jane Doe Design"), "jane-doe-design");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(normalize_slug("Acme & Co."), "acme-co");
        assert_eq!(normalize_slug("O'Brien Consulting"), "obrien-consulting");
    }

    #[test]
    fn distinct_names_can_collide() {
        // "Acme & Co." and "Acme Co" map to the same slug; resolution order
        // (oldest account first) decides the winner.
        assert_eq!(normalize_slug("Acme & Co."), normalize_slug("Acme Co"));
    }

    #[test]
    fn collapses_hyphen_and_whitespace_runs() {
        assert_eq!(normalize_slug("a  -  b"), "a-b");
        assert_eq!(normalize_slug("--edge--case--"), "edge-case");
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(normalize_slug("Café Über"), "caf-ber");
    }

    #[test]
    fn empty_and_symbol_only_names_yield_empty_slug() {
        assert_eq!(normalize_slug(""), "");
        assert_eq!(normalize_slug("!!!"), "");
    }

    #[test]
    fn idempotent() {
        for name in ["Acme & Co.", "Jane   Doe", "x9 Labs"] {
            let once = normalize_slug(name);
            assert_eq!(normalize_slug(&once), once);
        }
    }
}

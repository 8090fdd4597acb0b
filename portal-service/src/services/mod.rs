pub mod allowlist;
pub mod database;
pub mod email;
pub mod error;
pub mod portal_auth;
pub mod slug;

pub use allowlist::AllowlistService;
pub use database::Database;
pub use email::{EmailProvider, EmailService, MockEmailService};
pub use error::ServiceError;
pub use portal_auth::{PortalAuthService, SessionGrant};
pub use slug::{normalize_slug, SlugResolver};

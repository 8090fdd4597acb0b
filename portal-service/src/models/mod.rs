pub mod account;
pub mod client;
pub mod client_session;
pub mod magic_link_token;
pub mod member;

pub use account::{Account, Profile};
pub use client::Client;
pub use client_session::ClientSession;
pub use magic_link_token::MagicLinkToken;
pub use member::{AllowlistMember, MemberRole};

use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Company not found")]
    AccountNotFound,

    #[error("Client not found or does not belong to this account")]
    ClientNotFound,

    #[error("Member not found")]
    MemberNotFound,

    #[error("Email not authorized for this portal")]
    NotAllowed,

    #[error("Cannot remove the main client from the portal")]
    ProtectedMember,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid session")]
    SessionInvalid,

    #[error("Session has expired")]
    SessionExpired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password not set up. Please set up your password first.")]
    PasswordNotConfigured,

    #[error("No valid members provided")]
    NoValidMembers,

    #[error("Email error: {0}")]
    EmailError(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::AccountNotFound => {
                AppError::NotFound(anyhow::anyhow!("Company not found"))
            }
            ServiceError::ClientNotFound => AppError::NotFound(anyhow::anyhow!(
                "Client not found or does not belong to this account"
            )),
            ServiceError::MemberNotFound => AppError::NotFound(anyhow::anyhow!("Member not found")),
            ServiceError::NotAllowed => AppError::Forbidden(anyhow::anyhow!(
                "Email not authorized for this portal. Please contact your administrator to be added to the access list."
            )),
            ServiceError::ProtectedMember => AppError::Forbidden(anyhow::anyhow!(
                "Cannot remove the main client from the portal"
            )),
            ServiceError::TokenInvalid => AppError::CredentialError {
                message: "Invalid token".to_string(),
                expired: false,
            },
            ServiceError::TokenExpired => AppError::CredentialError {
                message: "Token has expired".to_string(),
                expired: true,
            },
            ServiceError::SessionInvalid => AppError::CredentialError {
                message: "Invalid session".to_string(),
                expired: false,
            },
            ServiceError::SessionExpired => AppError::CredentialError {
                message: "Session has expired".to_string(),
                expired: true,
            },
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid email or password"))
            }
            ServiceError::PasswordNotConfigured => AppError::BadRequest(anyhow::anyhow!(
                "Password not set up. Please set up your password first."
            )),
            ServiceError::NoValidMembers => {
                AppError::BadRequest(anyhow::anyhow!("No valid members provided"))
            }
            ServiceError::EmailError(e) => AppError::EmailError(e),
        }
    }
}

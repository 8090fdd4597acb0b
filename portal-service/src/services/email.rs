use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use service_core::axum::async_trait;
use std::time::Duration;

use super::ServiceError;

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_magic_link_email(
        &self,
        to_email: &str,
        recipient_name: &str,
        company_name: &str,
        magic_link: &str,
    ) -> Result<(), ServiceError>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from_email: String,
}

impl EmailService {
    pub fn new(config: &crate::config::SmtpConfig) -> Result<Self, ServiceError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| ServiceError::EmailError(e.to_string()))?
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email service initialized");

        Ok(Self {
            mailer,
            from_email: config.from_email.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: &str,
        html_body: &str,
    ) -> Result<(), ServiceError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e: lettre::address::AddressError| {
                        ServiceError::EmailError(e.to_string())
                    })?,
            )
            .to(to_email
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    ServiceError::EmailError(e.to_string())
                })?)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| ServiceError::EmailError(e.to_string()))?;

        // Send email in blocking thread pool to avoid blocking async runtime
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| ServiceError::EmailError(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!(
                    to = %to_email,
                    subject = %subject,
                    "Email sent successfully"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e.to_string(),
                    to = %to_email,
                    "Failed to send email"
                );
                Err(ServiceError::EmailError(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EmailProvider for EmailService {
    async fn send_magic_link_email(
        &self,
        to_email: &str,
        recipient_name: &str,
        company_name: &str,
        magic_link: &str,
    ) -> Result<(), ServiceError> {
        let html_body = format!(
            r###"            <html>
                <body style="font-family: Arial, sans-serif;">
                    <h2>Sign in to your {company} portal</h2>
                    <p>Hi {name},</p>
                    <p>Click the link below to access your portal. No password needed:</p>
                    <p>
                        <a href="{link}" style="background-color: #4CAF50; color: white; padding: 14px 20px; text-decoration: none; border-radius: 4px;">
                            Open Portal
                        </a>
                    </p>
                    <p style="color: #666; font-size: 12px;">
                        This link will expire in 30 minutes. If you didn't request this, please ignore this email.
                    </p>
                </body>
            </html>
            "###,
            company = company_name,
            name = recipient_name,
            link = magic_link
        );

        let plain_body = format!(
            "Sign in to your {} portal\n\nHi {},\n\nVisit the following link to access your portal:\n\n{}\n\nThis link will expire in 30 minutes. If you didn't request this, please ignore this email.",
            company_name, recipient_name, magic_link
        );

        self.send_email(
            to_email,
            &format!("Your {} portal sign-in link", company_name),
            &plain_body,
            &html_body,
        )
        .await
    }
}

/// Test double that records what would have been sent.
#[derive(Default)]
pub struct MockEmailService {
    pub sent: std::sync::Mutex<Vec<SentEmail>>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub magic_link: String,
}

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_magic_link_email(
        &self,
        to_email: &str,
        _recipient_name: &str,
        _company_name: &str,
        magic_link: &str,
    ) -> Result<(), ServiceError> {
        self.sent
            .lock()
            .expect("mock email mutex poisoned")
            .push(SentEmail {
                to: to_email.to_string(),
                magic_link: magic_link.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_service_creation() {
        let config = crate::config::SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "portal@example.com".to_string(),
            password: "test_password".to_string(),
            from_email: "portal@example.com".to_string(),
        };

        let service = EmailService::new(&config);
        assert!(service.is_ok());
    }

    #[tokio::test]
    async fn mock_records_sent_links() {
        let mock = MockEmailService::default();
        mock.send_magic_link_email("a@x.com", "A", "Acme", "https://p/acme?token=t")
            .await
            .unwrap();
        let sent = mock.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
    }
}

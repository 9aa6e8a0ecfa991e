//! Outgoing e-mail.
//!
//! The service only sends one kind of message: the address-verification link
//! produced at registration. [`LogMailer`] writes it to the structured log,
//! which is what development and test deployments use.

use async_trait::async_trait;
use tracing::info;

#[derive(Debug, thiserror::Error)]
#[error("Failed to send e-mail to {recipient}: {reason}")]
pub struct MailerError {
    pub recipient: String,
    pub reason: String,
}

/// Delivers account e-mails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the "verify your e-mail" message containing `link`.
    async fn send_verification(&self, recipient: &str, link: &str) -> Result<(), MailerError>;
}

/// Mailer that records messages in the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, recipient: &str, link: &str) -> Result<(), MailerError> {
        info!(
            recipient,
            subject = "Verify your email",
            "Click the link to verify your email: {}",
            link
        );
        Ok(())
    }
}

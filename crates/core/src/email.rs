use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;

/// Receipt returned by a successful dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub message_id: String,
}

/// Trait for sending emails. Implement this to integrate with your
/// email service (SMTP, SendGrid, SES, etc.).
///
/// Dispatch is one attempt, fail-fast: the platform performs no retries.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email.
    ///
    /// - `to`: recipient email address
    /// - `subject`: email subject line
    /// - `html`: HTML body (may be empty)
    /// - `text`: plain-text body (may be empty)
    async fn send(&self, to: &str, subject: &str, html: &str, text: &str)
    -> AppResult<DispatchReceipt>;
}

/// Development email provider that logs emails to stderr.
///
/// Useful for local development and testing — no external dependencies.
pub struct ConsoleEmailProvider;

#[async_trait]
impl EmailProvider for ConsoleEmailProvider {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        _html: &str,
        text: &str,
    ) -> AppResult<DispatchReceipt> {
        eprintln!("[EMAIL] To: {to} | Subject: {subject} | Body: {text}");
        Ok(DispatchReceipt {
            message_id: Uuid::new_v4().to_string(),
        })
    }
}

use chrono::Duration;
use std::sync::Arc;

use crate::email::EmailProvider;
use crate::error::AppError;
use crate::logger::{Logger, TracingLogger};

/// Main platform configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Secret key for signing invitation tokens.
    ///
    /// Rotating it invalidates all outstanding invitation links.
    pub secret: String,

    /// Application name, used in email templates.
    ///
    /// Defaults to `"Schoolhouse"`.
    pub app_name: String,

    /// Public base URL used to build invitation links
    /// (e.g. `"https://app.example.com"`).
    pub base_url: String,

    /// Logger implementation.
    ///
    /// Defaults to a [`TracingLogger`] that delegates to the `tracing`
    /// crate. Set a custom implementation to integrate with your own
    /// logging infrastructure.
    pub logger: Arc<dyn Logger>,

    /// Invitation configuration.
    pub invitation: InvitationConfig,

    /// Password configuration.
    pub password: PasswordConfig,

    /// Email provider for outbound mail (invitations, welcome messages).
    pub email_provider: Option<Arc<dyn EmailProvider>>,
}

/// Invitation-specific configuration.
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Validity window of invitation tokens.
    pub expires_in: Duration,
}

/// Password policy and hashing configuration.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Minimum password length.
    pub min_length: usize,

    /// Argon2 configuration.
    pub argon2: Argon2Config,
}

/// Argon2 hashing configuration.
#[derive(Debug, Clone)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            app_name: "Schoolhouse".to_string(),
            base_url: "http://localhost:3000".to_string(),
            logger: Arc::new(TracingLogger),
            invitation: InvitationConfig::default(),
            password: PasswordConfig::default(),
            email_provider: None,
        }
    }
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expires_in: Duration::days(7),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            argon2: Argon2Config::default(),
        }
    }
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 4096, // 4MB
            time_cost: 3,      // 3 iterations
            parallelism: 1,    // 1 thread
        }
    }
}

impl AppConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the public base URL (e.g. `"https://app.example.com"`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom logger implementation.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set the invitation token validity window.
    pub fn invitation_expires_in(mut self, duration: Duration) -> Self {
        self.invitation.expires_in = duration;
        self
    }

    /// Set the minimum password length.
    pub fn password_min_length(mut self, length: usize) -> Self {
        self.password.min_length = length;
        self
    }

    /// Set the email provider.
    pub fn email_provider<E: EmailProvider + 'static>(mut self, provider: E) -> Self {
        self.email_provider = Some(Arc::new(provider));
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.secret.is_empty() {
            return Err(AppError::config("Secret key cannot be empty"));
        }

        if self.secret.len() < 32 {
            return Err(AppError::config(
                "Secret key must be at least 32 characters",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_requires_a_real_secret() {
        assert!(AppConfig::new("").validate().is_err());
        assert!(AppConfig::new("short").validate().is_err());
        assert!(
            AppConfig::new("this-is-a-valid-32-character-secret-key")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn defaults_match_invitation_policy() {
        let config = AppConfig::default();
        assert_eq!(config.invitation.expires_in, Duration::days(7));
        assert_eq!(config.password.min_length, 8);
    }
}

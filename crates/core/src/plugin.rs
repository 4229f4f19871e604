use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::email::EmailProvider;
use crate::error::{AppError, AppResult};
use crate::logger::Logger;
use crate::store::TenantStore;
use crate::token::InvitationTokenService;
use crate::types::{ApiRequest, ApiResponse, HttpMethod};

/// Plugin trait that request-handling modules implement.
///
/// Generic over `S` so handlers work against any [`TenantStore`]
/// implementation.
#[async_trait]
pub trait ApiPlugin<S: TenantStore>: Send + Sync {
    /// Plugin name - should be unique
    fn name(&self) -> &'static str;

    /// Routes that this plugin handles
    fn routes(&self) -> Vec<ApiRoute>;

    /// Called when the plugin is initialized
    async fn on_init(&self, ctx: &mut AppContext<S>) -> AppResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for each request - return Some(response) to handle, None to pass through
    async fn on_request(
        &self,
        req: &ApiRequest,
        ctx: &AppContext<S>,
    ) -> AppResult<Option<ApiResponse>>;
}

/// Route definition for plugins
#[derive(Debug, Clone)]
pub struct ApiRoute {
    pub path: String,
    pub method: HttpMethod,
    /// Identifier naming the operation this route performs.
    pub operation_id: String,
}

impl ApiRoute {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        operation_id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            operation_id: operation_id.into(),
        }
    }

    pub fn get(path: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, operation_id)
    }

    pub fn post(path: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path, operation_id)
    }
}

/// Context passed to plugin methods.
///
/// The store handle is injected explicitly — opened at process start and
/// shared by reference, never reached through a global.
pub struct AppContext<S: TenantStore> {
    pub config: Arc<AppConfig>,
    pub store: Arc<S>,
    pub tokens: InvitationTokenService,
    pub email_provider: Option<Arc<dyn EmailProvider>>,
}

impl<S: TenantStore> AppContext<S> {
    pub fn new(config: Arc<AppConfig>, store: Arc<S>) -> Self {
        let tokens = InvitationTokenService::new(&config.secret, config.invitation.expires_in);
        let email_provider = config.email_provider.clone();
        Self {
            config,
            store,
            tokens,
            email_provider,
        }
    }

    /// Get the email provider, returning an error if none is configured.
    pub fn email_provider(&self) -> AppResult<&dyn EmailProvider> {
        self.email_provider
            .as_deref()
            .ok_or_else(|| AppError::config("No email provider configured"))
    }

    /// Convenience accessor for the configured logger.
    pub fn logger(&self) -> &dyn Logger {
        self.config.logger.as_ref()
    }
}

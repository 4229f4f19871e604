//! Organization onboarding: invitation issuance and signup completion.
//!
//! The lifecycle is a three-state machine on the organization's status
//! column: `NONE → PENDING → ACTIVE`. An invite request creates the PENDING
//! row only after the invitation email is dispatched; redeeming the token
//! activates the organization and creates its administrator in one atomic
//! store operation.

pub mod handlers;
pub mod templates;
pub mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use schoolhouse_core::error::AppResult;
use schoolhouse_core::plugin::{ApiPlugin, ApiRoute, AppContext};
use schoolhouse_core::store::TenantStore;
use schoolhouse_core::types::{ApiRequest, ApiResponse, HttpMethod, SubscriptionTier};

/// Onboarding plugin configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Send a best-effort welcome email after signup completion.
    pub send_welcome_email: bool,
    /// Tier applied when an invite request omits `subscription`.
    pub default_subscription: SubscriptionTier,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            send_welcome_email: true,
            default_subscription: SubscriptionTier::Basic,
        }
    }
}

/// Organization onboarding plugin.
pub struct OnboardingPlugin {
    config: OnboardingConfig,
}

impl OnboardingPlugin {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            config: OnboardingConfig::default(),
        }
    }

    pub fn with_config(config: OnboardingConfig) -> Self {
        Self { config }
    }

    pub fn send_welcome_email(mut self, send: bool) -> Self {
        self.config.send_welcome_email = send;
        self
    }

    pub fn default_subscription(mut self, tier: SubscriptionTier) -> Self {
        self.config.default_subscription = tier;
        self
    }
}

#[async_trait]
impl<S: TenantStore> ApiPlugin<S> for OnboardingPlugin {
    fn name(&self) -> &'static str {
        "onboarding"
    }

    fn routes(&self) -> Vec<ApiRoute> {
        vec![
            ApiRoute::post("/organizations/invite", "invite_organization"),
            ApiRoute::get("/signup", "verify_invitation"),
            ApiRoute::post("/signup", "complete_signup"),
        ]
    }

    async fn on_request(
        &self,
        req: &ApiRequest,
        ctx: &AppContext<S>,
    ) -> AppResult<Option<ApiResponse>> {
        match (req.method(), req.path()) {
            (HttpMethod::Post, "/organizations/invite") => Ok(Some(
                handlers::handle_invite_organization(req, ctx, &self.config).await?,
            )),
            (HttpMethod::Get, "/signup") => {
                Ok(Some(handlers::handle_verify_invitation(req, ctx).await?))
            }
            (HttpMethod::Post, "/signup") => Ok(Some(
                handlers::handle_complete_signup(req, ctx, &self.config).await?,
            )),
            _ => Ok(None),
        }
    }
}

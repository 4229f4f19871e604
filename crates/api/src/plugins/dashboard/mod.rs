//! Role-scoped dashboard statistics.
//!
//! Two aggregations share one route: an organization-scoped card set
//! (counts + recent grades) and, for the platform owner, a cross-tenant
//! billing roll-up. Both are pure reads over current store state — no
//! caching, no snapshots.

pub mod handlers;
pub mod types;


use async_trait::async_trait;

use schoolhouse_core::error::AppResult;
use schoolhouse_core::plugin::{ApiPlugin, ApiRoute, AppContext};
use schoolhouse_core::store::TenantStore;
use schoolhouse_core::types::{ApiRequest, ApiResponse, HttpMethod};

/// Dashboard plugin.
pub struct DashboardPlugin;

impl DashboardPlugin {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<S: TenantStore> ApiPlugin<S> for DashboardPlugin {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn routes(&self) -> Vec<ApiRoute> {
        vec![ApiRoute::get("/dashboard/stats", "dashboard_stats")]
    }

    async fn on_request(
        &self,
        req: &ApiRequest,
        ctx: &AppContext<S>,
    ) -> AppResult<Option<ApiResponse>> {
        match (req.method(), req.path()) {
            (HttpMethod::Get, "/dashboard/stats") => {
                Ok(Some(handlers::handle_dashboard_stats(req, ctx).await?))
            }
            _ => Ok(None),
        }
    }
}

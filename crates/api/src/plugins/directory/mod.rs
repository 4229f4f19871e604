//! Tenant directory: scoped listings of organizations, students, and classes.
//!
//! Every entry point resolves the caller's capability set from the store
//! before composing a filter. Non-platform principals are clamped to their
//! own organization regardless of what the query string asks for.

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use schoolhouse_core::error::AppResult;
use schoolhouse_core::plugin::{ApiPlugin, ApiRoute, AppContext};
use schoolhouse_core::store::TenantStore;
use schoolhouse_core::types::{ApiRequest, ApiResponse, HttpMethod};

/// Directory plugin.
pub struct DirectoryPlugin;

impl DirectoryPlugin {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<S: TenantStore> ApiPlugin<S> for DirectoryPlugin {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn routes(&self) -> Vec<ApiRoute> {
        vec![
            ApiRoute::get("/organizations", "list_organizations"),
            ApiRoute::get("/students", "list_students"),
            ApiRoute::get("/classes", "list_classes"),
        ]
    }

    async fn on_request(
        &self,
        req: &ApiRequest,
        ctx: &AppContext<S>,
    ) -> AppResult<Option<ApiResponse>> {
        match (req.method(), req.path()) {
            (HttpMethod::Get, "/organizations") => {
                Ok(Some(handlers::handle_list_organizations(req, ctx).await?))
            }
            (HttpMethod::Get, "/students") => {
                Ok(Some(handlers::handle_list_students(req, ctx).await?))
            }
            (HttpMethod::Get, "/classes") => {
                Ok(Some(handlers::handle_list_classes(req, ctx).await?))
            }
            _ => Ok(None),
        }
    }
}

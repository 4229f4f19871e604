use std::sync::Arc;

use schoolhouse_core::{
    ApiPlugin, ApiRequest, ApiResponse, AppConfig, AppContext, AppError, AppResult, EmailProvider,
    HealthCheckResponse, HttpMethod, TenantStore,
};

/// The main application type, generic over the tenant store.
///
/// Holds the configuration, the injected store handle, and the registered
/// plugins; requests are dispatched to the first plugin that claims them.
pub struct Schoolhouse<S: TenantStore> {
    config: Arc<AppConfig>,
    plugins: Vec<Box<dyn ApiPlugin<S>>>,
    store: Arc<S>,
    context: AppContext<S>,
}

/// Initial builder for configuring the application.
///
/// Call `.store(store)` to obtain a [`TypedAppBuilder`] that can accept
/// plugins.
pub struct AppBuilder {
    config: AppConfig,
}

/// Typed builder returned by [`AppBuilder::store`].
pub struct TypedAppBuilder<S: TenantStore> {
    config: AppConfig,
    store: Arc<S>,
    plugins: Vec<Box<dyn ApiPlugin<S>>>,
}

impl AppBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Set the email provider.
    pub fn email_provider<E: EmailProvider + 'static>(mut self, provider: E) -> Self {
        self.config.email_provider = Some(Arc::new(provider));
        self
    }

    /// Set the tenant store, returning a [`TypedAppBuilder`].
    pub fn store<S: TenantStore>(self, store: S) -> TypedAppBuilder<S> {
        TypedAppBuilder {
            config: self.config,
            store: Arc::new(store),
            plugins: Vec::new(),
        }
    }
}

impl<S: TenantStore> TypedAppBuilder<S> {
    /// Add a plugin.
    pub fn plugin<P: ApiPlugin<S> + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Set the email provider.
    pub fn email_provider<E: EmailProvider + 'static>(mut self, provider: E) -> Self {
        self.config.email_provider = Some(Arc::new(provider));
        self
    }

    /// Build the application.
    pub async fn build(self) -> AppResult<Schoolhouse<S>> {
        self.config.validate()?;

        let config = Arc::new(self.config);
        let store = self.store;
        let mut context = AppContext::new(config.clone(), store.clone());

        for plugin in &self.plugins {
            plugin.on_init(&mut context).await?;
        }

        Ok(Schoolhouse {
            config,
            plugins: self.plugins,
            store,
            context,
        })
    }
}

impl<S: TenantStore> Schoolhouse<S> {
    /// Create a new application builder.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(config: AppConfig) -> AppBuilder {
        AppBuilder::new(config)
    }

    /// Handle a request.
    ///
    /// Errors from plugins and core handlers are converted into standardized
    /// JSON responses via [`AppError::into_response`], producing
    /// `{ "message": "..." }` with the appropriate HTTP status code.
    pub async fn handle_request(&self, req: ApiRequest) -> ApiResponse {
        match self.handle_request_inner(&req).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    /// Inner request handler that may return errors.
    async fn handle_request_inner(&self, req: &ApiRequest) -> AppResult<ApiResponse> {
        if let Some(response) = self.handle_core_request(req).await? {
            return Ok(response);
        }

        for plugin in &self.plugins {
            if let Some(response) = plugin.on_request(req, &self.context).await? {
                return Ok(response);
            }
        }

        Err(AppError::not_found("No handler found for this request"))
    }

    /// Handle core routes not owned by any plugin.
    async fn handle_core_request(&self, req: &ApiRequest) -> AppResult<Option<ApiResponse>> {
        match (req.method(), req.path()) {
            (HttpMethod::Get, "/health") => Ok(Some(ApiResponse::json(
                200,
                &HealthCheckResponse {
                    status: "ok",
                    service: "schoolhouse",
                },
            )?)),
            _ => Ok(None),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Get all plugins.
    pub fn plugins(&self) -> &[Box<dyn ApiPlugin<S>>] {
        &self.plugins
    }

    /// List all plugin names.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;

use crate::Schoolhouse;
use schoolhouse_core::{ApiRequest, ApiResponse, AppError, HttpMethod, TenantStore};

/// Integration trait for the Axum web framework.
pub trait AxumIntegration {
    /// Create an Axum router with all registered routes.
    fn axum_router(self) -> Router;
}

impl<S: TenantStore> AxumIntegration for Arc<Schoolhouse<S>> {
    fn axum_router(self) -> Router {
        let mut router = Router::new();

        // Core liveness route
        router = router.route("/health", get(create_handler::<S>()));

        // Register plugin routes
        for plugin in self.plugins() {
            for route in plugin.routes() {
                let handler_fn = create_handler::<S>();
                match route.method {
                    HttpMethod::Get => {
                        router = router.route(&route.path, get(handler_fn.clone()));
                    }
                    HttpMethod::Post => {
                        router = router.route(&route.path, post(handler_fn.clone()));
                    }
                    HttpMethod::Put => {
                        router = router.route(&route.path, axum::routing::put(handler_fn.clone()));
                    }
                    HttpMethod::Delete => {
                        router =
                            router.route(&route.path, axum::routing::delete(handler_fn.clone()));
                    }
                    _ => {} // Skip unsupported methods
                }
            }
        }

        router.with_state(self)
    }
}

fn create_handler<S: TenantStore>() -> impl Fn(
    State<Arc<Schoolhouse<S>>>,
    Request,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Response> + Send>,
> + Clone {
    |State(app): State<Arc<Schoolhouse<S>>>, req: Request| {
        Box::pin(async move {
            match convert_axum_request(req).await {
                Ok(api_req) => convert_api_response(app.handle_request(api_req).await),
                Err(err) => convert_app_error(err),
            }
        })
    }
}

async fn convert_axum_request(req: Request) -> Result<ApiRequest, AppError> {
    use std::collections::HashMap;

    let (parts, body) = req.into_parts();

    // Convert method
    let method = match parts.method {
        axum::http::Method::GET => HttpMethod::Get,
        axum::http::Method::POST => HttpMethod::Post,
        axum::http::Method::PUT => HttpMethod::Put,
        axum::http::Method::DELETE => HttpMethod::Delete,
        axum::http::Method::PATCH => HttpMethod::Patch,
        axum::http::Method::OPTIONS => HttpMethod::Options,
        axum::http::Method::HEAD => HttpMethod::Head,
        _ => {
            return Err(AppError::bad_request("Unsupported HTTP method"));
        }
    };

    // Convert headers
    let mut headers = HashMap::new();
    for (name, value) in parts.headers.iter() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(name.to_string(), value_str.to_string());
        }
    }

    // Get path
    let path = parts.uri.path().to_string();

    // Convert query parameters
    let mut query = HashMap::new();
    if let Some(query_str) = parts.uri.query() {
        for (key, value) in url::form_urlencoded::parse(query_str.as_bytes()) {
            query.insert(key.to_string(), value.to_string());
        }
    }

    // Convert body
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            if bytes.is_empty() {
                None
            } else {
                Some(bytes.to_vec())
            }
        }
        Err(_) => None,
    };

    Ok(ApiRequest::from_parts(method, path, headers, body_bytes, query))
}

fn convert_api_response(api_response: ApiResponse) -> Response {
    let mut response = Response::builder().status(
        StatusCode::from_u16(api_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    );

    // Add headers
    for (name, value) in api_response.headers {
        if let (Ok(header_name), Ok(header_value)) = (
            axum::http::HeaderName::from_bytes(name.as_bytes()),
            axum::http::HeaderValue::from_str(&value),
        ) {
            response = response.header(header_name, header_value);
        }
    }

    response
        .body(axum::body::Body::from(api_response.body))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::from("Internal server error"))
                .unwrap()
        })
}

fn convert_app_error(err: AppError) -> Response {
    convert_api_response(err.into_response())
}

//! Top-level router combining every lesson module.
//!
//! # Route Structure
//!
//! - `GET  /`            - Service index listing the lesson modules
//! - `GET  /health`      - Health check: database, cache, job queue
//! - `/todos/*`          - In-memory CRUD
//! - `/validation/*`     - Request validation rules
//! - `/di/*`             - API key dependencies and per-client rate limits
//! - `/books/*`          - SQLite CRUD with a read-through cache
//! - `/auth/*`           - JWT auth with roles and scopes
//! - `/background/*`     - Fire-and-forget background jobs
//! - `/middleware/*`     - Middleware demo endpoints
//! - `/errors/*`         - Structured error handling
//! - `/shop/*`           - Products and orders
//! - `/ml/*`             - Model inference
//!
//! # Middleware
//!
//! - **Panic recovery** - A panicking handler renders the internal error envelope
//! - **CORS** - Configured origins, `*` for any
//! - **Compression** - gzip
//! - **Tracing** - Structured request/response spans
//! - **Access log** - One line per request
//! - **Process time** - `X-Process-Time` and `X-Request-ID` headers
//! - **Rate limiting** - Per-client token bucket (server only)
//! - **Path normalization** - Trailing slash handling

use std::any::Any;

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::handlers::{health_handler, root_handler};
use crate::api::middleware::{process_time, rate_limit, request_log, tracing};
use crate::api::routes;
use crate::error::AppError;
use crate::state::AppState;

/// Builds the router with every lesson nested under its prefix.
///
/// Carries all middleware except the global rate limiter and path
/// normalization, which [`app_router`] adds on top.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/todos", routes::todo_routes())
        .nest("/validation", routes::validation_routes())
        .nest("/di", routes::di_routes())
        .nest("/books", routes::book_routes())
        .nest("/auth", routes::auth_routes(state.clone()))
        .nest("/background", routes::background_routes())
        .nest("/middleware", routes::middleware_routes())
        .nest("/errors", routes::error_routes())
        .nest("/shop", routes::shop_routes())
        .nest("/ml", routes::ml_routes())
        .layer(middleware::from_fn(process_time::layer))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_log::layer,
        ))
        .layer(tracing::layer())
        .layer(CompressionLayer::new().gzip(true))
        .layer(cors_layer(cors_origins))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Constructs the served application: [`build_router`] behind the global
/// rate limiter, with trailing slashes trimmed before routing.
///
/// # Errors
///
/// Fails if the rate limiter configuration is invalid.
pub fn app_router(
    state: AppState,
    cors_origins: &[String],
) -> anyhow::Result<NormalizePath<Router>> {
    let behind_proxy = state.behind_proxy;
    let router = build_router(state, cors_origins).layer(rate_limit::layer(behind_proxy)?);

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AnyOrigin);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AnyOrigin);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                ::tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(parsed))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    ::tracing::error!(panic = %detail, "Handler panicked");

    AppError::internal("An unexpected error occurred", json!({})).into_response()
}

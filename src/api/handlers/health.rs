//! Handlers for the service index and health check.

use axum::{Json, extract::State, http::StatusCode};
use std::collections::BTreeMap;

use crate::api::dto::health::{
    CheckStatus, HealthChecks, HealthCounts, HealthResponse, RootResponse,
};
use crate::state::AppState;

/// Path prefix of every lesson module.
pub const MODULES: &[(&str, &str)] = &[
    ("todos", "/todos"),
    ("validation", "/validation"),
    ("dependency_injection", "/di"),
    ("books", "/books"),
    ("auth", "/auth"),
    ("background_tasks", "/background"),
    ("middleware", "/middleware"),
    ("exception_handling", "/errors"),
    ("ecommerce", "/shop"),
    ("ml", "/ml"),
];

/// `GET /`
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        modules: MODULES.iter().copied().collect::<BTreeMap<_, _>>(),
    })
}

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` against the SQLite pool
/// 2. **Cache**: backend health check (always ok when caching is disabled)
/// 3. **Job queue**: channel open, reports free slots
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let cache_check = check_cache(&state).await;
    let queue_check = check_job_queue(&state);

    let all_healthy = db_check.is_ok() && cache_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
            job_queue: queue_check,
        },
        counts: HealthCounts {
            todos: state.todo_service.count().await.unwrap_or_default(),
            models_loaded: state.ml_service.model_count().await,
            predictions: state.ml_service.history_len().await,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.db.as_ref())
        .await
    {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend_name();
    if state.cache.health_check().await {
        CheckStatus::ok(format!("Backend: {backend}"))
    } else {
        CheckStatus::error(format!("Backend {backend} unreachable"))
    }
}

fn check_job_queue(state: &AppState) -> CheckStatus {
    if state.jobs.is_closed() {
        CheckStatus::error("Job queue is closed")
    } else {
        CheckStatus::ok(format!("Free slots: {}", state.jobs.capacity()))
    }
}

//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, cache setup, background worker spawning, model
//! loading and the Axum server lifecycle.

use crate::api::middleware::rate_limit::CLEANUP_INTERVAL;
use crate::application::services::MlService;
use crate::config::Config;
use crate::domain::job_worker::run_job_worker;
use crate::domain::jobs::JobQueue;
use crate::domain::task_log::TaskLog;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

const DB_CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool (retried with backoff)
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Background job worker
/// - ML models (loaded from `MODEL_DIR` or created)
/// - Axum HTTP server with graceful shutdown
///
/// Models are written back to disk once the server stops.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let task_log = Arc::new(TaskLog::new());
    let (jobs, job_rx) = JobQueue::channel(config.job_queue_capacity);
    tokio::spawn(run_job_worker(
        job_rx,
        task_log.clone(),
        Duration::from_millis(config.job_delay_ms),
    ));

    let ml_service = Arc::new(MlService::load_or_create(&config.model_dir).await);

    let state = AppState::build(&config, pool, cache, jobs, task_log, ml_service.clone())
        .await
        .context("Failed to build application state")?;

    let limits = Arc::clone(&state.rate_limit_service);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            let dropped = limits.prune(limits.window()).await;
            tracing::debug!(
                dropped,
                clients = limits.tracked_clients(),
                "Lesson rate limiters pruned"
            );
        }
    });

    let app = app_router(state, &config.cors_origins)?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Err(e) = ml_service.save_all().await {
        tracing::error!(error = %e, "Failed to save models");
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn connect_database(config: &Config) -> Result<SqlitePool> {
    let options = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout));

    let strategy = ExponentialBackoff::from_millis(100)
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS);

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(&config.database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

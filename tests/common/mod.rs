#![allow(dead_code)]

use api_tutorials::application::services::MlService;
use api_tutorials::config::Config;
use api_tutorials::domain::entities::LinearModel;
use api_tutorials::domain::job_worker::run_job_worker;
use api_tutorials::domain::jobs::JobQueue;
use api_tutorials::domain::task_log::TaskLog;
use api_tutorials::infrastructure::cache::NullCache;
use api_tutorials::routes::build_router;
use api_tutorials::state::AppState;
use axum_test::TestServer;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;

pub const ADMIN_KEY: &str = "admin_key_123";
pub const USER_KEY: &str = "user_key_456";

/// Password shared by every seeded auth account.
pub const DEMO_PASSWORD: &str = "secret";

/// Fresh in-memory database with migrations applied.
///
/// A single connection that never expires, so every query sees the same
/// in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}

pub fn test_config() -> Config {
    Config {
        jwt_secret: "test-signing-secret-0123456789abcdef".to_string(),
        ..Config::default()
    }
}

/// Two deterministic models: `default` sums its features, `model_v2` doubles the sum.
pub fn test_ml_service() -> MlService {
    MlService::new(
        std::env::temp_dir().join("api-tutorials-test-models"),
        vec![
            LinearModel::new("default", vec![1.0; 10], 0.0),
            LinearModel::new("model_v2", vec![2.0; 10], 1.0),
        ],
    )
}

pub async fn create_test_state(pool: SqlitePool) -> AppState {
    let task_log = Arc::new(TaskLog::new());
    let (jobs, rx) = JobQueue::channel(100);
    tokio::spawn(run_job_worker(rx, task_log.clone(), Duration::ZERO));

    AppState::build(
        &test_config(),
        pool,
        Arc::new(NullCache::new()),
        jobs,
        task_log,
        Arc::new(test_ml_service()),
    )
    .await
    .unwrap()
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub pool: SqlitePool,
}

/// Full router over a fresh database, without the global rate limiter.
pub async fn spawn_app() -> TestApp {
    let pool = create_test_pool().await;
    let state = create_test_state(pool.clone()).await;
    let router = build_router(state.clone(), &["*".to_string()]);

    TestApp {
        server: TestServer::new(router).unwrap(),
        state,
        pool,
    }
}

/// Logs in through `POST /auth/token` and returns the access token.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/auth/token")
        .form(&[("username", username), ("password", password)])
        .await;
    response.assert_status_ok();

    response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Polls until `check` holds, for work done by spawned tasks.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

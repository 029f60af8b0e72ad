//! Shared application state injected into every handler.

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::services::{
    ApiKeyService, AuthService, BookService, InventoryService, MemberService, MlService,
    RateLimitService, ShopService, TodoService,
};
use crate::config::Config;
use crate::domain::jobs::JobQueue;
use crate::domain::task_log::TaskLog;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::memory::{
    InMemoryAccountRepository, InMemoryMemberRepository, InMemoryRefreshTokenRepository,
    InMemoryTodoRepository,
};
use crate::infrastructure::persistence::{
    SqliteBookRepository, SqliteOrderRepository, SqliteProductRepository,
};

pub type Todos = TodoService<InMemoryTodoRepository>;
pub type Members = MemberService<InMemoryMemberRepository>;
pub type Books = BookService<SqliteBookRepository>;
pub type Auth = AuthService<InMemoryAccountRepository, InMemoryRefreshTokenRepository>;
pub type Shop = ShopService<SqliteProductRepository, SqliteOrderRepository>;

/// Requests per minute for the normal and strict DI rate limiters.
pub const NORMAL_RATE_PER_MINUTE: u32 = 10;
pub const STRICT_RATE_PER_MINUTE: u32 = 5;

/// Application state shared across all request handlers.
///
/// Cloned per request; every field is either an `Arc` or a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqlitePool>,
    pub cache: Arc<dyn CacheService>,
    pub jobs: JobQueue,
    pub task_log: Arc<TaskLog>,

    pub todo_service: Arc<Todos>,
    pub member_service: Arc<Members>,
    pub api_key_service: Arc<ApiKeyService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub book_service: Arc<Books>,
    pub auth_service: Arc<Auth>,
    pub inventory_service: Arc<InventoryService>,
    pub shop_service: Arc<Shop>,
    pub ml_service: Arc<MlService>,

    /// Read client addresses from forwarding headers.
    pub behind_proxy: bool,
    pub started_at: Instant,
}

impl AppState {
    /// Wires every lesson service on top of the given pool, cache and job queue,
    /// and seeds the demo accounts.
    ///
    /// # Errors
    ///
    /// Fails if the API key registry cannot be built or the seed accounts
    /// cannot be hashed.
    pub async fn build(
        config: &Config,
        pool: SqlitePool,
        cache: Arc<dyn CacheService>,
        jobs: JobQueue,
        task_log: Arc<TaskLog>,
        ml_service: Arc<MlService>,
    ) -> Result<Self, AppError> {
        let pool = Arc::new(pool);

        let todo_service = TodoService::new(Arc::new(InMemoryTodoRepository::new()));
        let member_service = MemberService::new(
            Arc::new(InMemoryMemberRepository::new()),
            config.allowed_email_domains.clone(),
        );
        let api_key_service = ApiKeyService::new(&config.jwt_secret, &config.api_keys)?;
        let rate_limit_service =
            RateLimitService::new(NORMAL_RATE_PER_MINUTE, STRICT_RATE_PER_MINUTE);

        let book_service = BookService::new(
            Arc::new(SqliteBookRepository::new(pool.clone())),
            cache.clone(),
            config.cache_ttl_seconds,
        );

        let auth_service = AuthService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryRefreshTokenRepository::new()),
            &config.jwt_secret,
            config.access_token_ttl_minutes,
            config.refresh_token_ttl_days,
        );
        auth_service.seed_demo_accounts().await?;

        let shop_service = ShopService::new(
            Arc::new(SqliteProductRepository::new(pool.clone())),
            Arc::new(SqliteOrderRepository::new(pool.clone())),
            jobs.clone(),
        );

        Ok(Self {
            db: pool,
            cache,
            jobs,
            task_log,
            todo_service: Arc::new(todo_service),
            member_service: Arc::new(member_service),
            api_key_service: Arc::new(api_key_service),
            rate_limit_service: Arc::new(rate_limit_service),
            book_service: Arc::new(book_service),
            auth_service: Arc::new(auth_service),
            inventory_service: Arc::new(InventoryService::with_seed_items()),
            shop_service: Arc::new(shop_service),
            ml_service,
            behind_proxy: config.behind_proxy,
            started_at: Instant::now(),
        })
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

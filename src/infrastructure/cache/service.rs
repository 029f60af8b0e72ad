//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache holding serialized JSON documents.
///
/// Implementations are fail-open: backend errors are logged and reported as
/// misses, so callers fall back to the database.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached value, or `Ok(None)` on a miss or backend error.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value. `ttl_seconds = None` uses the backend default.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Removes every key starting with `prefix`. Returns the number removed.
    async fn invalidate_prefix(&self, prefix: &str) -> CacheResult<u64>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name reported by the stats endpoints.
    fn backend_name(&self) -> &'static str;
}

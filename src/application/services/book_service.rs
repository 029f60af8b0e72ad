//! Book catalogue service with cache-aside reads.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::{Book, BookFilter, BookPatch, BookStats, NewBook};
use crate::domain::repositories::BookRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

const STATS_KEY: &str = "books:stats";
/// Shared by `book:{id}` and `books:stats`.
const CACHE_PREFIX: &str = "book";

fn book_key(id: i64) -> String {
    format!("book:{id}")
}

/// Hit/miss counters since startup.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub backend: &'static str,
    pub ttl_seconds: u64,
}

/// Book CRUD backed by SQLite with a read-through cache.
///
/// Reads of a single book and of the summary stats go through the cache;
/// every write invalidates the affected book key and the stats key.
pub struct BookService<R: BookRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    ttl_seconds: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

fn book_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Book with ID {id} not found"), json!({ "id": id }))
}

fn isbn_taken(isbn: &str) -> AppError {
    AppError::conflict(
        format!("Book with ISBN {isbn} already exists"),
        json!({ "isbn": isbn }),
    )
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>, ttl_seconds: u64) -> Self {
        Self {
            repository,
            cache,
            ttl_seconds,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key).await.ok().flatten();

        match raw.and_then(|raw| serde_json::from_str(&raw).ok()) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                let _ = self.cache.set(key, &raw, Some(self.ttl_seconds)).await;
            }
            Err(e) => tracing::warn!(key, error = %e, "Failed to serialize cache entry"),
        }
    }

    async fn invalidate(&self, id: i64) {
        let _ = self.cache.invalidate(&book_key(id)).await;
        let _ = self.cache.invalidate(STATS_KEY).await;
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the ISBN is already used.
    pub async fn create(&self, new_book: NewBook) -> Result<Book, AppError> {
        if let Some(ref isbn) = new_book.isbn
            && self.repository.find_by_isbn(isbn).await?.is_some()
        {
            return Err(isbn_taken(isbn));
        }

        let book = self.repository.create(new_book).await?;
        let _ = self.cache.invalidate(STATS_KEY).await;
        metrics::counter!("book_writes_total", "op" => "create").increment(1);

        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    pub async fn list(&self, filter: BookFilter) -> Result<Vec<Book>, AppError> {
        self.repository.list(filter).await
    }

    /// Cache-aside lookup: cache first, then the database, then populate.
    pub async fn get(&self, id: i64) -> Result<Book, AppError> {
        let key = book_key(id);

        if let Some(book) = self.cached::<Book>(&key).await {
            return Ok(book);
        }

        let book = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| book_not_found(id))?;

        self.store(&key, &book).await;
        Ok(book)
    }

    pub async fn update(&self, id: i64, patch: BookPatch) -> Result<Book, AppError> {
        if let Some(ref isbn) = patch.isbn
            && let Some(other) = self.repository.find_by_isbn(isbn).await?
            && other.id != id
        {
            return Err(isbn_taken(isbn));
        }

        let book = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| book_not_found(id))?;

        self.invalidate(id).await;
        metrics::counter!("book_writes_total", "op" => "update").increment(1);
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(book_not_found(id));
        }

        self.invalidate(id).await;
        metrics::counter!("book_writes_total", "op" => "delete").increment(1);
        Ok(())
    }

    pub async fn stats(&self) -> Result<BookStats, AppError> {
        if let Some(stats) = self.cached::<BookStats>(STATS_KEY).await {
            return Ok(stats);
        }

        let stats = self.repository.stats().await?;
        self.store(STATS_KEY, &stats).await;
        Ok(stats)
    }

    pub fn cache_stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
            backend: self.cache.backend_name(),
            ttl_seconds: self.ttl_seconds,
        }
    }

    /// Drops every cached book and the stats entry. Returns the number of keys removed.
    pub async fn clear_cache(&self) -> Result<u64, AppError> {
        let removed = self
            .cache
            .invalidate_prefix(CACHE_PREFIX)
            .await
            .map_err(|e| {
                AppError::internal("Cache clear failed", json!({ "reason": e.to_string() }))
            })?;

        tracing::info!(removed, "Book cache cleared");
        Ok(removed)
    }
}

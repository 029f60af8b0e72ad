//! Repository trait for books.

use crate::domain::entities::{Book, BookFilter, BookPatch, BookStats, NewBook};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for the book catalogue.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteBookRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_book.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Inserts a book.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the ISBN is already taken.
    async fn create(&self, new_book: NewBook) -> Result<Book, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, AppError>;

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, AppError>;

    async fn list(&self, filter: BookFilter) -> Result<Vec<Book>, AppError>;

    /// Applies a patch and bumps `updated_at`. Returns `Ok(None)` if the id is unknown.
    async fn update(&self, id: i64, patch: BookPatch) -> Result<Option<Book>, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn stats(&self) -> Result<BookStats, AppError>;
}

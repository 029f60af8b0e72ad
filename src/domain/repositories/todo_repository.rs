//! Repository trait for todo items.

use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for todos.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::InMemoryTodoRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Stores a todo and assigns the next identifier.
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Todo>, AppError>;

    /// Lists todos in id order, optionally filtered by completion, at most `limit`.
    async fn list(&self, completed: Option<bool>, limit: usize) -> Result<Vec<Todo>, AppError>;

    /// Applies a patch. Returns `Ok(None)` if the id is unknown.
    async fn update(&self, id: u64, patch: TodoPatch) -> Result<Option<Todo>, AppError>;

    /// Returns `Ok(true)` if a todo was removed.
    async fn delete(&self, id: u64) -> Result<bool, AppError>;

    /// Removes every todo and restarts identifiers from 1.
    async fn clear(&self) -> Result<(), AppError>;

    async fn count(&self) -> Result<usize, AppError>;
}

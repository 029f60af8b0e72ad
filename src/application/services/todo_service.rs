//! Todo CRUD service.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::domain::repositories::TodoRepository;
use crate::error::AppError;

pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

fn todo_not_found(id: u64) -> AppError {
    AppError::not_found(format!("Todo with ID {id} not found"), json!({ "id": id }))
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError> {
        let todo = self.repository.create(new_todo).await?;
        metrics::counter!("todo_writes_total", "op" => "create").increment(1);
        Ok(todo)
    }

    pub async fn list(&self, completed: Option<bool>, limit: usize) -> Result<Vec<Todo>, AppError> {
        self.repository.list(completed, limit).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id.
    pub async fn get(&self, id: u64) -> Result<Todo, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| todo_not_found(id))
    }

    pub async fn update(&self, id: u64, patch: TodoPatch) -> Result<Todo, AppError> {
        let todo = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| todo_not_found(id))?;
        metrics::counter!("todo_writes_total", "op" => "update").increment(1);
        Ok(todo)
    }

    pub async fn delete(&self, id: u64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(todo_not_found(id));
        }
        metrics::counter!("todo_writes_total", "op" => "delete").increment(1);
        Ok(())
    }

    /// Drops every todo and restarts id assignment at 1.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.repository.clear().await
    }

    pub async fn count(&self) -> Result<usize, AppError> {
        self.repository.count().await
    }
}

//! In-memory todo repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::domain::repositories::TodoRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct TodoTable {
    rows: BTreeMap<u64, Todo>,
    last_id: u64,
}

/// Todos kept in a `BTreeMap` so listing is naturally in id order.
///
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    table: RwLock<TodoTable>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let todo = Todo::new(table.last_id, new_todo, Utc::now());
        table.rows.insert(todo.id, todo.clone());

        Ok(todo)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Todo>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, completed: Option<bool>, limit: usize) -> Result<Vec<Todo>, AppError> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .values()
            .filter(|todo| completed.is_none_or(|c| todo.completed == c))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(&self, id: u64, patch: TodoPatch) -> Result<Option<Todo>, AppError> {
        let mut table = self.table.write().await;

        Ok(table.rows.get_mut(&id).map(|todo| {
            todo.apply(patch);
            todo.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<bool, AppError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn clear(&self) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        table.rows.clear();
        table.last_id = 0;
        Ok(())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.table.read().await.rows.len())
    }
}

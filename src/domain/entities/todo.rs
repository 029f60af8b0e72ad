//! Todo item kept in process memory.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A todo item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(id: u64, new_todo: NewTodo, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_todo.title,
            description: new_todo.description,
            completed: new_todo.completed,
            created_at,
        }
    }

    /// Applies a partial update; `None` fields are left unchanged.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Input data for creating a todo.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Partial update of a todo.
///
/// `description` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

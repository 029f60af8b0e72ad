//! DTOs for the todo endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::{NewTodo, TodoPatch};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(req: CreateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

/// Partial update. An explicit `"description": null` clears the description,
/// an absent key leaves it unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 500))]
    pub description: Option<Option<String>>,

    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListTodosQuery {
    pub completed: Option<bool>,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_description_is_left_unchanged() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert!(req.description.is_none());
    }

    #[test]
    fn test_null_description_clears_it() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(req.description, Some(None));
    }

    #[test]
    fn test_long_description_is_rejected() {
        let req = UpdateTodoRequest {
            title: None,
            description: Some(Some("x".repeat(501))),
            completed: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let req = CreateTodoRequest {
            title: String::new(),
            description: None,
            completed: false,
        };
        assert!(req.validate().is_err());
    }
}

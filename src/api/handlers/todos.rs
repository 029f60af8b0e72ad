//! Handlers for the in-memory todo list.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::todos::{CreateTodoRequest, ListTodosQuery, UpdateTodoRequest};
use crate::api::extract::{AppPath, ValidatedJson, ValidatedQuery};
use crate::domain::entities::Todo;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /todos`
pub async fn create_todo_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = state.todo_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `GET /todos?completed=&limit=`
pub async fn list_todos_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListTodosQuery>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state
        .todo_service
        .list(query.completed, query.limit)
        .await?;
    Ok(Json(todos))
}

/// `GET /todos/{id}`
pub async fn get_todo_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(state.todo_service.get(id).await?))
}

/// `PUT /todos/{id}`; only supplied fields change.
pub async fn update_todo_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(state.todo_service.update(id, payload.into()).await?))
}

/// `DELETE /todos/{id}`
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<StatusCode, AppError> {
    state.todo_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /todos`; also resets the id counter.
pub async fn clear_todos_handler(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let removed = state.todo_service.count().await?;
    state.todo_service.clear().await?;
    tracing::info!(removed, "Todos cleared");
    Ok(StatusCode::NO_CONTENT)
}

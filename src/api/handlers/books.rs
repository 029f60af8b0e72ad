//! Handlers for the SQLite book catalogue with cache-aside reads.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::books::{
    BookStatsResponse, CreateBookRequest, ListBooksQuery, UpdateBookRequest,
};
use crate::api::extract::{AppPath, ValidatedJson, ValidatedQuery};
use crate::application::services::book_service::CacheStats;
use crate::domain::entities::Book;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /books`
///
/// # Errors
///
/// - 409 when another book already has the ISBN
pub async fn create_book_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = state.book_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /books?skip&limit&author&year`
pub async fn list_books_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListBooksQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(state.book_service.list(query.into()).await?))
}

/// `GET /books/{id}`, served from the cache when possible.
pub async fn get_book_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(state.book_service.get(id).await?))
}

/// `PUT /books/{id}`
pub async fn update_book_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateBookRequest>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(state.book_service.update(id, payload.into()).await?))
}

/// `DELETE /books/{id}`
pub async fn delete_book_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.book_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /books/stats/summary`
pub async fn book_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<BookStatsResponse>, AppError> {
    Ok(Json(state.book_service.stats().await?.into()))
}

/// `GET /books/cache/stats`
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.book_service.cache_stats())
}

/// `DELETE /books/cache`
pub async fn clear_cache_handler(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let removed = state.book_service.clear_cache().await?;
    tracing::info!(removed, "Book cache cleared");
    Ok(StatusCode::NO_CONTENT)
}

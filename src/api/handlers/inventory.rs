//! Handlers for the exception-handling lesson.
//!
//! Every failure is an [`AppError`] carrying its own status and code; the
//! global error rendering turns them into the shared envelope.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::api::dto::inventory::{CreateItemRequest, ItemsResponse, StockOrderRequest};
use crate::api::extract::{AppPath, ValidatedJson};
use crate::domain::entities::{InventoryItem, StockOrder};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /errors/items`
pub async fn list_items_handler(State(state): State<AppState>) -> Json<ItemsResponse> {
    Json(ItemsResponse {
        items: state.inventory_service.list().await,
    })
}

/// `GET /errors/items/{id}`; unknown ids fail with `item_not_found`.
pub async fn get_item_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<InventoryItem>, AppError> {
    Ok(Json(state.inventory_service.get(id).await?))
}

/// `POST /errors/items`
pub async fn create_item_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let item = state.inventory_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `POST /errors/orders`
pub async fn place_stock_order_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StockOrderRequest>,
) -> Result<(StatusCode, Json<StockOrder>), AppError> {
    let order = state
        .inventory_service
        .place_order(payload.item_id, payload.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `DELETE /errors/items/{id}`
pub async fn delete_item_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<StatusCode, AppError> {
    state.inventory_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /errors/test-error`; the cause is logged, never returned.
pub async fn test_error_handler() -> Result<StatusCode, AppError> {
    let cause = anyhow::anyhow!("simulated failure while talking to the warehouse system");
    tracing::error!(error = %cause, "Unexpected error in test endpoint");
    Err(AppError::internal("An unexpected error occurred", json!({})))
}

/// `GET /errors/test-value-error`
pub async fn test_value_error_handler() -> Result<StatusCode, AppError> {
    Err(AppError::bad_request(
        "Invalid value provided",
        json!({ "field": "value", "reason": "must be a positive number" }),
    ))
}

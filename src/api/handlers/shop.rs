//! Handlers for the e-commerce products and orders.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::shop::{
    CreateOrderRequest, CreateProductRequest, ListOrdersQuery, ListProductsQuery,
    UpdateProductRequest, UpdateStatusRequest,
};
use crate::api::extract::{AppPath, ValidatedJson, ValidatedQuery};
use crate::domain::entities::{Order, Product};
use crate::error::AppError;
use crate::state::AppState;

/// `POST /shop/products`
pub async fn create_product_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.shop_service.create_product(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /shop/products?skip&limit&category&min_price&max_price&in_stock`
pub async fn list_products_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.shop_service.list_products(query.into()).await?))
}

/// `GET /shop/products/{id}`
pub async fn get_product_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.shop_service.get_product(id).await?))
}

/// `PUT /shop/products/{id}`
pub async fn update_product_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(
        state.shop_service.update_product(id, payload.into()).await?,
    ))
}

/// `DELETE /shop/products/{id}`
pub async fn delete_product_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.shop_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /shop/orders`
///
/// Stock is checked and decremented in one transaction; an order
/// confirmation job is queued afterwards.
///
/// # Errors
///
/// - 404 when a product does not exist
/// - 400 when a product has insufficient stock
pub async fn create_order_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.shop_service.place_order(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /shop/orders?skip&limit&status`; line items are omitted.
pub async fn list_orders_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.shop_service.list_orders(query.into()).await?))
}

/// `GET /shop/orders/{id}`
pub async fn get_order_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.shop_service.get_order(id).await?))
}

/// `PATCH /shop/orders/{id}/status`
pub async fn update_order_status_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(
        state
            .shop_service
            .update_order_status(id, payload.status)
            .await?,
    ))
}

/// `DELETE /shop/orders/{id}`; restores stock for every line.
pub async fn cancel_order_handler(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.shop_service.cancel_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Echo endpoints for the request-validation lesson.
//!
//! Nothing is stored: each handler returns what it received once the
//! extractor has checked every constraint.

use axum::{Json, extract::RawQuery, http::StatusCode};
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

use crate::api::dto::validation::{
    ComplexItemRequest, FilterParams, NestedValidationRequest, OrderPath, PlaceOrderRequest,
    PositiveIdPath, ProductModel, RegexExamplesQuery, ReviewModel, SearchQuery, SendEmailQuery,
    SkuPath, UserIdPath, UserModel, VerifiedPurchaseQuery,
};
use crate::api::extract::{AppQuery, ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::error::AppError;

/// `GET /validation/search`
pub async fn search_handler(ValidatedQuery(query): ValidatedQuery<SearchQuery>) -> Json<Value> {
    Json(json!({
        "query": query.q,
        "page": query.page,
        "limit": query.limit,
        "sort_by": query.sort_by,
        "price_range": { "min": query.min_price, "max": query.max_price },
        "results": format!(
            "Showing {} results for '{}' on page {}",
            query.limit, query.q, query.page
        ),
    }))
}

/// `GET /validation/filter?category=..&tags=a&tags=b`
pub async fn filter_handler(RawQuery(raw): RawQuery) -> Result<Json<FilterParams>, AppError> {
    let params = FilterParams::from_query(raw.as_deref().unwrap_or_default()).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("query", e);
        AppError::from(errors)
    })?;
    params.validate()?;
    Ok(Json(params))
}

/// `GET /validation/users/{user_id}`
pub async fn get_user_handler(ValidatedPath(path): ValidatedPath<UserIdPath>) -> Json<Value> {
    Json(json!({
        "user_id": path.user_id,
        "message": format!("Fetching user {}", path.user_id),
    }))
}

/// `GET /validation/products/{sku}`
pub async fn get_product_handler(ValidatedPath(path): ValidatedPath<SkuPath>) -> Json<Value> {
    Json(json!({
        "sku": path.sku,
        "message": format!("Fetching product {}", path.sku),
    }))
}

/// `GET /validation/orders/{year}/{month}/{order_id}`
pub async fn get_order_handler(ValidatedPath(path): ValidatedPath<OrderPath>) -> Json<Value> {
    Json(json!({
        "year": path.year,
        "month": path.month,
        "order_id": path.order_id,
        "message": format!("Fetching order {} from {}/{}", path.order_id, path.month, path.year),
    }))
}

/// `POST /validation/users`
pub async fn create_user_handler(
    ValidatedJson(user): ValidatedJson<UserModel>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": user })),
    )
}

/// `POST /validation/products`
pub async fn create_product_handler(
    ValidatedJson(product): ValidatedJson<ProductModel>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Product created successfully", "product": product })),
    )
}

/// `POST /validation/reviews`
pub async fn create_review_handler(
    ValidatedJson(review): ValidatedJson<ReviewModel>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Review created successfully", "review": review })),
    )
}

/// `PUT /validation/users/{id}?send_email=`
pub async fn update_user_handler(
    ValidatedPath(path): ValidatedPath<PositiveIdPath>,
    AppQuery(query): AppQuery<SendEmailQuery>,
    ValidatedJson(user): ValidatedJson<UserModel>,
) -> Json<Value> {
    Json(json!({
        "message": format!("User {} updated successfully", path.id),
        "send_email": query.send_email,
        "updated_user": user,
    }))
}

/// `POST /validation/products/{id}/reviews?verified_purchase=`
pub async fn add_product_review_handler(
    ValidatedPath(path): ValidatedPath<PositiveIdPath>,
    AppQuery(query): AppQuery<VerifiedPurchaseQuery>,
    ValidatedJson(review): ValidatedJson<ReviewModel>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Review added to product {}", path.id),
            "verified_purchase": query.verified_purchase,
            "review": review,
        })),
    )
}

/// `POST /validation/items/complex`; nested models are validated too.
pub async fn create_complex_item_handler(
    ValidatedJson(item): ValidatedJson<ComplexItemRequest>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Complex item created",
            "product": item.product,
            "user": item.user,
            "quantity": item.quantity,
            "notes": item.notes,
        })),
    )
}

/// `POST /validation/orders/place`
pub async fn place_order_handler(
    ValidatedJson(order): ValidatedJson<PlaceOrderRequest>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "product_id": order.product_id,
            "quantity": order.quantity,
            "priority": order.priority,
            "discount_code": order.discount_code,
        })),
    )
}

/// `GET /validation/advanced/regex-examples`
pub async fn regex_examples_handler(
    ValidatedQuery(query): ValidatedQuery<RegexExamplesQuery>,
) -> Json<Value> {
    Json(json!({
        "ip_address": query.ip_address,
        "hex_color": query.hex_color,
        "url_slug": query.url_slug,
        "credit_card": query.credit_card.as_deref().unwrap_or("Not provided"),
    }))
}

/// `POST /validation/advanced/nested-validation`
pub async fn nested_validation_handler(
    ValidatedJson(body): ValidatedJson<NestedValidationRequest>,
) -> Json<NestedValidationRequest> {
    Json(body)
}

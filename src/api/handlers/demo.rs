//! Demo endpoints for the middleware lesson.
//!
//! The interesting work happens in the global layers; these handlers only
//! give them something to wrap.

use axum::{Json, extract::rejection::JsonRejection, http::HeaderMap};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::api::dto::demo::{HeadersResponse, LargeItem, SlowQuery};
use crate::api::extract::ValidatedQuery;
use crate::error::AppError;

/// Number of items in the compressible payload.
pub const LARGE_ITEM_COUNT: usize = 1000;

/// `GET /middleware/fast`
pub async fn fast_handler() -> Json<Value> {
    Json(json!({ "message": "Fast response" }))
}

/// `GET /middleware/slow?delay_ms=`
pub async fn slow_handler(ValidatedQuery(query): ValidatedQuery<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(query.delay_ms)).await;
    Json(json!({ "message": "Slow response", "delay_ms": query.delay_ms }))
}

/// `POST /middleware/echo`; any JSON object.
pub async fn echo_handler(
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let keys = body.len();
    Ok(Json(json!({ "received": body, "keys": keys })))
}

/// `GET /middleware/large`
pub async fn large_handler() -> Json<Vec<LargeItem>> {
    let items = (1..=LARGE_ITEM_COUNT)
        .map(|id| LargeItem {
            id,
            name: format!("Item {id}"),
            description: format!(
                "Description for item {id}, repeated to make the payload worth compressing"
            ),
        })
        .collect();
    Json(items)
}

/// `GET /middleware/headers`
pub async fn headers_handler(headers: HeaderMap) -> Json<HeadersResponse> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect();

    Json(HeadersResponse {
        count: headers.len(),
        headers,
    })
}

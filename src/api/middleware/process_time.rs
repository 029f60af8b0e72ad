//! Response timing and request correlation headers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub static PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Adds `X-Process-Time` (seconds, four decimals) and a fresh `X-Request-Id`
/// (UUID v4) to every response.
pub async fn layer(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let mut response = next.run(req).await;

    let elapsed = format!("{:.4}", start.elapsed().as_secs_f64());
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        headers.insert(PROCESS_TIME_HEADER.clone(), value);
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}

//! Access log line per request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Logs `ip "METHOD path VERSION" status "user-agent" Nms` once the response is ready.
pub async fn layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();

    let ip = client_ip(req.headers(), req.extensions(), state.behind_proxy);
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let version = format!("{:?}", req.version());

    let ua = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let ms = start.elapsed().as_millis();

    tracing::info!(
        target: "access_log",
        r#"{ip} "{method} {path} {version}" {status} "{ua}" {ms}ms"#,
    );

    response
}

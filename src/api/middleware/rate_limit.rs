//! Global per-client rate limiting.

use anyhow::{Context, Result};
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

use crate::utils::client_ip::client_ip;

/// How often idle client keys are dropped from limiter state.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Keys requests by the resolved client address.
///
/// Shares [`client_ip`] with the lesson limiters and the request log, so a
/// client is identified the same way everywhere.
#[derive(Debug, Clone, Copy)]
pub struct ClientKeyExtractor {
    pub behind_proxy: bool,
}

impl KeyExtractor for ClientKeyExtractor {
    type Key = String;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req.headers(), req.extensions(), self.behind_proxy))
    }
}

/// Creates the global rate limiter applied in front of every route.
///
/// # Limits
///
/// - **Rate**: 10 requests per second
/// - **Burst**: 200 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// The socket peer address, or the first `X-Forwarded-For` / `X-Real-IP`
/// value when `behind_proxy` is set.
///
/// # Example
///
/// ```rust,ignore
/// let app = build_router(state, &origins).layer(rate_limit::layer(false)?);
/// ```
///
/// Must run inside a Tokio runtime: a task is spawned that drops idle client
/// keys every [`CLEANUP_INTERVAL`].
pub fn layer(
    behind_proxy: bool,
) -> Result<GovernorLayer<ClientKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(100)
        .burst_size(200)
        .key_extractor(ClientKeyExtractor { behind_proxy })
        .finish()
        .context("Invalid global rate limit configuration")?;

    let limiter = governor_conf.limiter().clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            tracing::debug!(clients = limiter.len(), "Global rate limiter pruned");
        }
    });

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

//! Injectable request dependencies for the dependency-injection lesson.
//!
//! Each type here is an extractor. Listing it as a handler argument makes
//! axum resolve it before the handler runs, and a failed resolution
//! short-circuits the request with the extractor's [`AppError`].
//!
//! ```text
//! ApiKey ──► Admin          (chained: admin needs a valid key first)
//! ClientIp ──► NormalRate / StrictRate
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::Serialize;
use serde_json::json;

use crate::api::extract::ClientIp;
use crate::application::services::{ApiKeyIdentity, RateTier};
use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Caller identified by the `X-API-Key` header.
#[derive(Debug, Clone)]
pub struct ApiKey(pub ApiKeyIdentity);

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        let identity = state.api_key_service.authenticate(key)?;
        Ok(Self(identity))
    }
}

/// Caller whose API key carries the `admin` role.
#[derive(Debug, Clone)]
pub struct Admin(pub ApiKeyIdentity);

impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ApiKey(identity) = ApiKey::from_request_parts(parts, state).await?;

        if !identity.is_admin() {
            tracing::warn!(name = %identity.name, "Non-admin key used on admin endpoint");
            return Err(AppError::forbidden(
                "Admin access required",
                json!({ "role": identity.role }),
            ));
        }

        Ok(Self(identity))
    }
}

async fn check_rate(parts: &mut Parts, state: &AppState, tier: RateTier) -> Result<u32, AppError> {
    let Ok(ClientIp(client)) = ClientIp::from_request_parts(parts, state).await;
    state.rate_limit_service.check(tier, &client).await
}

/// Passed the normal per-client limiter; carries the remaining capacity.
#[derive(Debug, Clone, Copy)]
pub struct NormalRate(pub u32);

impl FromRequestParts<AppState> for NormalRate {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_rate(parts, state, RateTier::Normal).await.map(Self)
    }
}

/// Passed the strict per-client limiter used by write endpoints.
#[derive(Debug, Clone, Copy)]
pub struct StrictRate(pub u32);

impl FromRequestParts<AppState> for StrictRate {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_rate(parts, state, RateTier::Strict).await.map(Self)
    }
}

/// Request metadata gathered from the incoming request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub user_agent: Option<String>,
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(ClientIp(client_ip)) = ClientIp::from_request_parts(parts, state).await;

        Ok(Self {
            client_ip,
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            user_agent: parts
                .headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
    }
}

//! HTTP middleware for request processing and protection.
//!
//! - [`auth`] - Bearer JWT authentication
//! - [`process_time`] - `X-Process-Time` and `X-Request-Id` headers
//! - [`rate_limit`] - Global per-client limiter
//! - [`request_log`] - Access log line per request
//! - [`tracing`] - Request spans and latency

pub mod auth;
pub mod process_time;
pub mod rate_limit;
pub mod request_log;
pub mod tracing;

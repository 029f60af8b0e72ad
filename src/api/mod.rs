//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to the lesson contracts.
//!
//! # Modules
//!
//! - [`dto`] - Request/response payloads and their validation rules
//! - [`extract`] - Validating extractors that reject with the JSON error envelope
//! - [`dependencies`] - Injectable API key, admin and rate limit dependencies
//! - [`handlers`] - HTTP request handlers, one module per lesson
//! - [`middleware`] - Bearer authentication, logging, timing and rate limiting
//! - [`routes`] - Per-lesson routers

pub mod dependencies;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

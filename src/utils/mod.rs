//! Helpers shared across the API layer.
//!
//! - [`client_ip`] - Client address resolution for rate limiting and logs
//! - [`patterns`] - Compiled regular expressions used by request validation

pub mod client_ip;
pub mod patterns;

//! DTOs for the middleware lesson's demo endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SlowQuery {
    #[serde(default = "default_delay")]
    #[validate(range(max = 5000))]
    pub delay_ms: u64,
}

fn default_delay() -> u64 {
    500
}

#[derive(Debug, Serialize)]
pub struct LargeItem {
    pub id: usize,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct HeadersResponse {
    pub headers: BTreeMap<String, String>,
    pub count: usize,
}

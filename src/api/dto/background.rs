//! DTOs for the background-task lesson.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::task_log::TaskLogEntry;

#[derive(Debug, Deserialize, Validate)]
pub struct NotificationRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 500))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NotificationQueued {
    pub message: &'static str,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BackgroundOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub item: String,

    #[validate(range(min = 1, max = 1000))]
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct OrderQueued {
    pub message: &'static str,
    pub order_id: String,
    pub item: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LogsQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub total: usize,
    pub logs: Vec<TaskLogEntry>,
}

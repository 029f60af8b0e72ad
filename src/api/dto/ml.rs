//! DTOs for the ML inference lesson.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ml_service::{DEFAULT_MODEL, PredictionStats};
use crate::domain::entities::PredictionRecord;

#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    pub features: Vec<f64>,

    #[serde(default = "default_model")]
    #[validate(length(min = 1))]
    pub model_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchPredictRequest {
    #[validate(length(min = 1, max = 1000))]
    pub batch: Vec<Vec<f64>>,

    #[serde(default = "default_model")]
    #[validate(length(min = 1))]
    pub model_name: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    10
}

/// Largest page the history endpoint returns.
pub const MAX_HISTORY_PAGE: usize = 100;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: usize,
    pub limit: usize,
    pub predictions: Vec<PredictionRecord>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Empty {
        total_predictions: usize,
        message: &'static str,
    },
    Stats(PredictionStats),
}

impl From<Option<PredictionStats>> for StatsResponse {
    fn from(stats: Option<PredictionStats>) -> Self {
        match stats {
            Some(stats) => Self::Stats(stats),
            None => Self::Empty {
                total_predictions: 0,
                message: "No predictions yet",
            },
        }
    }
}

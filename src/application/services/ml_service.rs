//! Model registry and prediction history for the ML inference lesson.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{LinearModel, PredictionRecord};
use crate::error::AppError;

pub const HISTORY_CAPACITY: usize = 1000;
pub const DEFAULT_MODEL: &str = "default";
const SECONDARY_MODEL: &str = "model_v2";

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loaded: bool,
    pub feature_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub prediction: f64,
    pub model_name: String,
    pub inference_time_ms: f64,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchPrediction {
    pub predictions: Vec<f64>,
    pub model_name: String,
    pub batch_size: usize,
    pub total_inference_time_ms: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionStats {
    pub total_predictions: usize,
    pub avg_inference_time_ms: f64,
    pub min_inference_time_ms: f64,
    pub max_inference_time_ms: f64,
    pub predictions_by_model: BTreeMap<String, usize>,
}

type History = Arc<RwLock<VecDeque<PredictionRecord>>>;

fn model_not_found(name: &str) -> AppError {
    AppError::not_found(
        format!("Model '{name}' not found"),
        json!({ "model_name": name }),
    )
}

async fn push_record(history: &History, record: PredictionRecord) {
    let mut history = history.write().await;
    if history.len() == HISTORY_CAPACITY {
        history.pop_front();
    }
    history.push_back(record);
}

/// In-memory linear models and the last [`HISTORY_CAPACITY`] predictions.
///
/// Predictions are recorded by a spawned task so the response does not wait
/// on the history lock.
pub struct MlService {
    models: RwLock<BTreeMap<String, Arc<LinearModel>>>,
    history: History,
    model_dir: PathBuf,
}

impl MlService {
    pub fn new(model_dir: impl Into<PathBuf>, models: Vec<LinearModel>) -> Self {
        let models = models
            .into_iter()
            .map(|m| (m.name.clone(), Arc::new(m)))
            .collect();

        Self {
            models: RwLock::new(models),
            history: Arc::new(RwLock::new(VecDeque::new())),
            model_dir: model_dir.into(),
        }
    }

    /// Loads `default` from `{model_dir}/default.json`, falling back to random
    /// weights, and adds a random `model_v2`.
    pub async fn load_or_create(model_dir: &Path) -> Self {
        let path = model_dir.join(format!("{DEFAULT_MODEL}.json"));

        let default = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<LinearModel>(&bytes) {
                Ok(model) => {
                    tracing::info!(path = %path.display(), "Loaded model from disk");
                    model
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Model file unreadable, using random weights"
                    );
                    LinearModel::random(DEFAULT_MODEL)
                }
            },
            Err(_) => {
                tracing::info!("No saved model found, creating one with random weights");
                LinearModel::random(DEFAULT_MODEL)
            }
        };

        Self::new(
            model_dir,
            vec![default, LinearModel::random(SECONDARY_MODEL)],
        )
    }

    /// Writes every model to `{model_dir}/{name}.json`.
    pub async fn save_all(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.model_dir).await?;

        for model in self.models.read().await.values() {
            let path = self.model_dir.join(format!("{}.json", model.name));
            tokio::fs::write(&path, serde_json::to_vec_pretty(model.as_ref())?).await?;
            tracing::info!(path = %path.display(), "Model saved");
        }

        Ok(())
    }

    pub async fn model_count(&self) -> usize {
        self.models.read().await.len()
    }

    pub async fn models(&self) -> Vec<ModelInfo> {
        self.models
            .read()
            .await
            .values()
            .map(|m| ModelInfo {
                name: m.name.clone(),
                kind: m.kind(),
                loaded: true,
                feature_count: m.feature_count(),
            })
            .collect()
    }

    async fn model(&self, name: &str) -> Result<Arc<LinearModel>, AppError> {
        self.models
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| model_not_found(name))
    }

    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown model
    /// - [`AppError::BadRequest`] when the feature count does not match
    pub async fn predict(
        &self,
        model_name: &str,
        features: &[f64],
    ) -> Result<Prediction, AppError> {
        let model = self.model(model_name).await?;

        let started = Instant::now();
        let prediction = model.predict(features).map_err(|e| {
            AppError::bad_request(
                e.to_string(),
                json!({ "expected": e.expected, "actual": e.actual }),
            )
        })?;
        let inference_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        let result = Prediction {
            prediction,
            model_name: model_name.to_string(),
            inference_time_ms,
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        };

        metrics::counter!("predictions_total", "model" => model_name.to_string()).increment(1);

        let history = Arc::clone(&self.history);
        let record = PredictionRecord {
            request_id: result.request_id.clone(),
            timestamp: result.timestamp,
            model_name: result.model_name.clone(),
            feature_count: features.len(),
            prediction,
            inference_time_ms,
        };
        tokio::spawn(async move {
            tracing::debug!(request_id = %record.request_id, "Prediction logged");
            push_record(&history, record).await;
        });

        Ok(result)
    }

    /// All-or-nothing batch prediction: any malformed row fails the whole batch.
    pub async fn predict_batch(
        &self,
        model_name: &str,
        batch: &[Vec<f64>],
    ) -> Result<BatchPrediction, AppError> {
        let model = self.model(model_name).await?;

        let started = Instant::now();
        let predictions = batch
            .iter()
            .enumerate()
            .map(|(row, features)| {
                model.predict(features).map_err(|e| {
                    AppError::bad_request(
                        format!("Row {row}: {e}"),
                        json!({ "row": row, "expected": e.expected, "actual": e.actual }),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total_inference_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            model_name,
            batch_size = batch.len(),
            total_inference_time_ms,
            "Batch prediction"
        );
        metrics::counter!("predictions_total", "model" => model_name.to_string())
            .increment(batch.len() as u64);

        Ok(BatchPrediction {
            predictions,
            model_name: model_name.to_string(),
            batch_size: batch.len(),
            total_inference_time_ms,
            timestamp: Utc::now(),
        })
    }

    /// Total number of records and the most recent `limit`, oldest first.
    pub async fn history(&self, limit: usize) -> (usize, Vec<PredictionRecord>) {
        let history = self.history.read().await;
        let skip = history.len().saturating_sub(limit);
        (history.len(), history.iter().skip(skip).cloned().collect())
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn record(&self, record: PredictionRecord) {
        push_record(&self.history, record).await;
    }

    /// `None` while no prediction has been recorded.
    pub async fn stats(&self) -> Option<PredictionStats> {
        let history = self.history.read().await;
        if history.is_empty() {
            return None;
        }

        let times = history.iter().map(|r| r.inference_time_ms);
        let mut predictions_by_model = BTreeMap::new();
        for record in history.iter() {
            *predictions_by_model
                .entry(record.model_name.clone())
                .or_insert(0) += 1;
        }

        Some(PredictionStats {
            total_predictions: history.len(),
            avg_inference_time_ms: times.clone().sum::<f64>() / history.len() as f64,
            min_inference_time_ms: times.clone().fold(f64::INFINITY, f64::min),
            max_inference_time_ms: times.fold(f64::NEG_INFINITY, f64::max),
            predictions_by_model,
        })
    }
}

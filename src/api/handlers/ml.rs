//! Handlers for linear-model inference.

use axum::{Json, extract::State};

use crate::api::dto::ml::{
    BatchPredictRequest, HistoryQuery, HistoryResponse, MAX_HISTORY_PAGE, PredictRequest,
    StatsResponse,
};
use crate::api::extract::{AppQuery, ValidatedJson};
use crate::application::services::ml_service::{BatchPrediction, ModelInfo, Prediction};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /ml/models`
pub async fn list_models_handler(State(state): State<AppState>) -> Json<Vec<ModelInfo>> {
    Json(state.ml_service.models().await)
}

/// `POST /ml/predict`
///
/// # Errors
///
/// - 404 when the model does not exist
/// - 400 when the feature count does not match the model
pub async fn predict_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PredictRequest>,
) -> Result<Json<Prediction>, AppError> {
    let prediction = state
        .ml_service
        .predict(&payload.model_name, &payload.features)
        .await?;
    Ok(Json(prediction))
}

/// `POST /ml/predict/batch`; one bad row fails the whole batch.
pub async fn predict_batch_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BatchPredictRequest>,
) -> Result<Json<BatchPrediction>, AppError> {
    let result = state
        .ml_service
        .predict_batch(&payload.model_name, &payload.batch)
        .await?;
    Ok(Json(result))
}

/// `GET /ml/predictions/history?limit=`; capped at 100 records.
pub async fn history_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HistoryQuery>,
) -> Json<HistoryResponse> {
    let limit = query.limit.min(MAX_HISTORY_PAGE);
    let (total, predictions) = state.ml_service.history(limit).await;

    Json(HistoryResponse {
        total,
        limit,
        predictions,
    })
}

/// `GET /ml/predictions/stats`
pub async fn prediction_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.ml_service.stats().await.into())
}

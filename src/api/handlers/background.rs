//! Handlers that enqueue background jobs and read the task log.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::dto::background::{
    BackgroundOrderRequest, LogsQuery, LogsResponse, NotificationQueued, NotificationRequest,
    OrderQueued,
};
use crate::api::extract::{ValidatedJson, ValidatedQuery};
use crate::domain::jobs::Job;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /background/notifications`; responds before the job runs.
pub async fn send_notification_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NotificationRequest>,
) -> Result<(StatusCode, Json<NotificationQueued>), AppError> {
    state.jobs.enqueue(Job::Notification {
        email: payload.email.clone(),
        message: payload.message,
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(NotificationQueued {
            message: "Notification queued",
            email: payload.email,
        }),
    ))
}

/// `POST /background/orders`
pub async fn process_order_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BackgroundOrderRequest>,
) -> Result<(StatusCode, Json<OrderQueued>), AppError> {
    let order_id = format!("ORD-{}", &Uuid::new_v4().simple().to_string()[..8].to_uppercase());

    state.jobs.enqueue(Job::OrderProcessing {
        order_id: order_id.clone(),
        item: payload.item.clone(),
        quantity: payload.quantity,
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(OrderQueued {
            message: "Order queued for processing",
            order_id,
            item: payload.item,
            quantity: payload.quantity,
        }),
    ))
}

/// `GET /background/logs?limit=`; most recent entry last.
pub async fn task_logs_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<LogsQuery>,
) -> Json<LogsResponse> {
    Json(LogsResponse {
        total: state.task_log.len().await,
        logs: state.task_log.recent(query.limit).await,
    })
}

/// `DELETE /background/logs`
pub async fn clear_task_logs_handler(State(state): State<AppState>) -> StatusCode {
    state.task_log.clear().await;
    StatusCode::NO_CONTENT
}

mod common;

use common::{eventually, spawn_app};
use serde_json::{Value, json};

fn features(value: f64) -> Vec<f64> {
    vec![value; 10]
}

#[tokio::test]
async fn test_list_models() {
    let app = spawn_app().await;

    let models = app.server.get("/ml/models").await.json::<Vec<Value>>();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["name"], "default");
    assert_eq!(models[0]["type"], "LinearRegression");
    assert_eq!(models[0]["loaded"], true);
    assert_eq!(models[0]["feature_count"], 10);
    assert_eq!(models[1]["name"], "model_v2");
}

#[tokio::test]
async fn test_predict_with_default_model() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/ml/predict")
        .json(&json!({ "features": features(1.5) }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["prediction"], 15.0);
    assert_eq!(body["model_name"], "default");
    assert!(body["inference_time_ms"].as_f64().unwrap() >= 0.0);
    assert!(uuid::Uuid::parse_str(body["request_id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_predict_with_named_model() {
    let app = spawn_app().await;

    let body = app
        .server
        .post("/ml/predict")
        .json(&json!({ "features": features(1.0), "model_name": "model_v2" }))
        .await
        .json::<Value>();

    assert_eq!(body["prediction"], 21.0);
}

#[tokio::test]
async fn test_feature_count_mismatch() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/ml/predict")
        .json(&json!({ "features": [1.0, 2.0, 3.0] }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Expected 10 features, got 3"
    );
}

#[tokio::test]
async fn test_unknown_model() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/ml/predict")
        .json(&json!({ "features": features(1.0), "model_name": "gpt" }))
        .await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Model 'gpt' not found"
    );
}

#[tokio::test]
async fn test_batch_prediction() {
    let app = spawn_app().await;

    let body = app
        .server
        .post("/ml/predict/batch")
        .json(&json!({ "batch": [features(1.0), features(2.0), features(0.0)] }))
        .await
        .json::<Value>();

    assert_eq!(body["predictions"], json!([10.0, 20.0, 0.0]));
    assert_eq!(body["batch_size"], 3);
    assert_eq!(body["model_name"], "default");
}

#[tokio::test]
async fn test_batch_fails_on_any_bad_row() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/ml/predict/batch")
        .json(&json!({ "batch": [features(1.0), [1.0]] }))
        .await;

    response.assert_status_bad_request();
    let error = &response.json::<Value>()["error"];
    assert_eq!(error["message"], "Row 1: Expected 10 features, got 1");
    assert_eq!(error["details"]["row"], 1);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let app = spawn_app().await;

    app.server
        .post("/ml/predict/batch")
        .json(&json!({ "batch": [] }))
        .await
        .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stats_before_any_prediction() {
    let app = spawn_app().await;

    let body = app.server.get("/ml/predictions/stats").await.json::<Value>();

    assert_eq!(
        body,
        json!({ "total_predictions": 0, "message": "No predictions yet" })
    );
}

#[tokio::test]
async fn test_history_and_stats_after_predictions() {
    let app = spawn_app().await;

    for model in ["default", "default", "model_v2"] {
        app.server
            .post("/ml/predict")
            .json(&json!({ "features": features(1.0), "model_name": model }))
            .await
            .assert_status_ok();
    }

    let ml = app.state.ml_service.clone();
    eventually(|| {
        let ml = ml.clone();
        async move { ml.history_len().await == 3 }
    })
    .await;

    let history = app
        .server
        .get("/ml/predictions/history")
        .add_query_param("limit", 2)
        .await
        .json::<Value>();
    assert_eq!(history["total"], 3);
    assert_eq!(history["limit"], 2);
    assert_eq!(history["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(history["predictions"][0]["feature_count"], 10);

    let stats = app.server.get("/ml/predictions/stats").await.json::<Value>();
    assert_eq!(stats["total_predictions"], 3);
    assert_eq!(
        stats["predictions_by_model"],
        json!({ "default": 2, "model_v2": 1 })
    );
}

#[tokio::test]
async fn test_history_limit_is_capped() {
    let app = spawn_app().await;

    let history = app
        .server
        .get("/ml/predictions/history")
        .add_query_param("limit", 500)
        .await
        .json::<Value>();

    assert_eq!(history["limit"], 100);
    assert_eq!(history["total"], 0);
}

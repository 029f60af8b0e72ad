mod common;

use common::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = spawn_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["job_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = spawn_app().await;

    let json = app.server.get("/health").await.json::<Value>();

    assert!(json.get("version").is_some());
    assert!(json.get("uptime_seconds").is_some());
    assert_eq!(json["counts"]["todos"], 0);
    assert_eq!(json["counts"]["models_loaded"], 2);
    assert_eq!(json["counts"]["predictions"], 0);
}

#[tokio::test]
async fn test_health_counts_follow_state() {
    let app = spawn_app().await;
    app.server
        .post("/todos")
        .json(&serde_json::json!({ "title": "count me" }))
        .await;

    let json = app.server.get("/health").await.json::<Value>();
    assert_eq!(json["counts"]["todos"], 1);
}

#[tokio::test]
async fn test_health_degrades_when_database_is_closed() {
    let app = spawn_app().await;
    app.pool.close().await;

    let response = app.server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_root_lists_every_module() {
    let app = spawn_app().await;

    let response = app.server.get("/").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["name"], "api-tutorials");
    let modules = json["modules"].as_object().unwrap();
    assert_eq!(modules.len(), 10);
    assert_eq!(modules["ecommerce"], "/shop");
    assert_eq!(modules["dependency_injection"], "/di");
}

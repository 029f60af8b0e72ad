mod common;

use axum::http::StatusCode;
use common::{ADMIN_KEY, USER_KEY, spawn_app};
use serde_json::{Value, json};

const KEY_HEADER: &str = "X-API-Key";

fn member(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email, "age": 30 })
}

async fn create_member(server: &axum_test::TestServer, name: &str, email: &str) -> Value {
    let response = server
        .post("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .json(&member(name, email))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

// ─── API key dependency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_api_key() {
    let app = spawn_app().await;

    let response = app.server.get("/di/users").await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "API key is missing"
    );
}

#[tokio::test]
async fn test_unknown_api_key() {
    let app = spawn_app().await;

    app.server
        .get("/di/users")
        .add_header(KEY_HEADER, "guess_key_000")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_list_reports_caller() {
    let app = spawn_app().await;
    create_member(&app.server, "Ada Lovelace", "ada@gmail.com").await;

    let response = app
        .server
        .get("/di/users?skip=0&limit=5")
        .add_header(KEY_HEADER, USER_KEY)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["requested_by"], "user");
    assert_eq!(body["users"][0]["name"], "Ada Lovelace");
}

// ─── Member rules ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_rejects_foreign_email_domain() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .json(&member("Ada Lovelace", "ada@evil.org"))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["details"]["domain"], "evil.org");
}

#[tokio::test]
async fn test_create_rejects_digits_in_name() {
    let app = spawn_app().await;

    app.server
        .post("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .json(&member("R2D2", "r2@gmail.com"))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let app = spawn_app().await;
    create_member(&app.server, "Ada Lovelace", "ada@gmail.com").await;

    app.server
        .post("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .json(&member("Ada Again", "ada@gmail.com"))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_and_update_member() {
    let app = spawn_app().await;
    let created = create_member(&app.server, "Ada Lovelace", "ada@gmail.com").await;
    let id = created["id"].as_u64().unwrap();

    let updated = app
        .server
        .put(&format!("/di/users/{id}"))
        .add_header(KEY_HEADER, USER_KEY)
        .json(&json!({ "age": 36 }))
        .await;
    updated.assert_status_ok();
    let body = updated.json::<Value>();
    assert_eq!(body["age"], 36);
    assert_eq!(body["name"], "Ada Lovelace");

    app.server
        .get("/di/users/999")
        .add_header(KEY_HEADER, USER_KEY)
        .await
        .assert_status_not_found();
}

// ─── Admin dependency ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = spawn_app().await;
    let created = create_member(&app.server, "Ada Lovelace", "ada@gmail.com").await;
    let path = format!("/di/users/{}", created["id"]);

    app.server
        .delete(&path)
        .add_header(KEY_HEADER, USER_KEY)
        .await
        .assert_status_forbidden();

    let response = app.server.delete(&path).add_header(KEY_HEADER, ADMIN_KEY).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["deleted_by"], "admin");

    app.server
        .delete(&path)
        .add_header(KEY_HEADER, ADMIN_KEY)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_stats_groups_by_domain() {
    let app = spawn_app().await;
    create_member(&app.server, "Ada Lovelace", "ada@gmail.com").await;
    create_member(&app.server, "Grace Hopper", "grace@gmail.com").await;
    create_member(&app.server, "Alan Turing", "alan@outlook.com").await;

    let response = app
        .server
        .get("/di/stats")
        .add_header(KEY_HEADER, ADMIN_KEY)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total_users"], 3);
    assert_eq!(body["api_keys_configured"], 2);
    assert_eq!(body["users_by_domain"]["gmail.com"], 2);
    assert_eq!(body["users_by_domain"]["outlook.com"], 1);
}

// ─── Rate limits ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_eleventh_normal_request_is_rate_limited() {
    let app = spawn_app().await;

    for _ in 0..10 {
        app.server
            .get("/di/users")
            .add_header(KEY_HEADER, USER_KEY)
            .await
            .assert_status_ok();
    }

    let response = app
        .server
        .get("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "rate_limited");
    assert_eq!(
        body["error"]["message"],
        "Rate limit exceeded. Max 10 requests per 60 seconds."
    );
}

#[tokio::test]
async fn test_sixth_strict_request_is_rate_limited() {
    let app = spawn_app().await;
    let emails = ["a@gmail.com", "b@gmail.com", "c@gmail.com", "d@gmail.com", "e@gmail.com"];

    for email in emails {
        create_member(&app.server, "Some Body", email).await;
    }

    app.server
        .post("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .json(&member("Some Body", "f@gmail.com"))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limit_status_does_not_consume() {
    let app = spawn_app().await;

    app.server
        .get("/di/users")
        .add_header(KEY_HEADER, USER_KEY)
        .await
        .assert_status_ok();

    let first = app.server.get("/di/rate-limit-status").await.json::<Value>();
    let second = app.server.get("/di/rate-limit-status").await.json::<Value>();

    assert_eq!(first["client"], "unknown");
    assert_eq!(first["normal"]["limit"], 10);
    assert_eq!(first["strict"]["limit"], 5);
    assert_eq!(first["strict"]["remaining"], 5);
    assert_eq!(first["window_seconds"], 60);
    assert!(first["normal"]["remaining"].as_u64().unwrap() < 10);
    assert_eq!(first["normal"]["remaining"], second["normal"]["remaining"]);
}

#[tokio::test]
async fn test_forwarded_for_is_ignored_without_proxy() {
    let app = spawn_app().await;

    let body = app
        .server
        .get("/di/rate-limit-status")
        .add_header("X-Forwarded-For", "203.0.113.9")
        .await
        .json::<Value>();

    assert_eq!(body["client"], "unknown");
}

// ─── Learning endpoints ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_learning_endpoints() {
    let app = spawn_app().await;

    let simple = app
        .server
        .get("/di/learn/simple-dependency")
        .add_header(KEY_HEADER, USER_KEY)
        .await
        .json::<Value>();
    assert_eq!(simple["dependencies"], json!(["api_key"]));

    let multiple = app
        .server
        .get("/di/learn/multiple-dependencies")
        .add_header(KEY_HEADER, USER_KEY)
        .add_header("User-Agent", "lesson-test")
        .await
        .json::<Value>();
    assert_eq!(multiple["request"]["method"], "GET");
    assert_eq!(multiple["request"]["user_agent"], "lesson-test");
    assert_eq!(multiple["rate_limit_remaining"], 9);

    app.server
        .get("/di/learn/chained-dependencies")
        .add_header(KEY_HEADER, USER_KEY)
        .await
        .assert_status_forbidden();

    let chained = app
        .server
        .get("/di/learn/chained-dependencies")
        .add_header(KEY_HEADER, ADMIN_KEY)
        .await;
    chained.assert_status_ok();
    assert_eq!(chained.json::<Value>()["admin"], "admin");
}

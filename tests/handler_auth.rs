mod common;

use axum::http::StatusCode;
use common::{DEMO_PASSWORD, bearer, eventually, login, spawn_app};
use serde_json::{Value, json};

async fn token_pair(server: &axum_test::TestServer, username: &str) -> Value {
    let response = server
        .post("/auth/token")
        .form(&[("username", username), ("password", DEMO_PASSWORD)])
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

// ─── Register / token ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_returns_account_without_hash() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "username": "new_user",
            "email": "new@example.com",
            "password": "Str0ngPass",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["username"], "new_user");
    assert_eq!(body["role"], "user");
    assert_eq!(body["scopes"], json!(["items:read"]));
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "Str0ngPass",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_cannot_self_assign_admin() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "username": "sneaky",
            "email": "sneaky@example.com",
            "password": "Str0ngPass",
            "role": "admin",
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_weak_password_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "username": "weak",
            "email": "weak@example.com",
            "password": "password",
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"].get("password").is_some());
}

#[tokio::test]
async fn test_token_wrong_password() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/token")
        .form(&[("username", "alice"), ("password", "nope")])
        .await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Incorrect username or password"
    );
}

#[tokio::test]
async fn test_token_disabled_account() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/token")
        .form(&[("username", "dave"), ("password", DEMO_PASSWORD)])
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["message"], "Inactive user");
}

#[tokio::test]
async fn test_token_response_shape() {
    let app = spawn_app().await;
    let pair = token_pair(&app.server, "bob").await;

    assert_eq!(pair["token_type"], "bearer");
    assert_eq!(pair["expires_in"], 30 * 60);
    assert!(pair["access_token"].is_string());
    assert!(pair["refresh_token"].is_string());
}

// ─── Bearer middleware ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = spawn_app().await;

    let response = app.server.get("/auth/users/me").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = spawn_app().await;

    app.server
        .get("/auth/users/me")
        .add_header("Authorization", "Bearer not-a-jwt")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = spawn_app().await;
    let pair = token_pair(&app.server, "bob").await;
    let refresh = pair["refresh_token"].as_str().unwrap();

    app.server
        .get("/auth/users/me")
        .add_header("Authorization", bearer(refresh))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_me_returns_current_account() {
    let app = spawn_app().await;
    let token = login(&app.server, "alice", DEMO_PASSWORD).await;

    let response = app
        .server
        .get("/auth/users/me")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "admin");
}

// ─── Scopes and roles ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_scope_is_forbidden() {
    let app = spawn_app().await;
    let token = login(&app.server, "bob", DEMO_PASSWORD).await;

    let response = app
        .server
        .post("/auth/items")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Notebook" }))
        .await;

    response.assert_status_forbidden();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["message"], "Not enough permissions");
    assert_eq!(body["error"]["details"]["required_scope"], "items:write");
}

#[tokio::test]
async fn test_items_are_scoped_to_owner() {
    let app = spawn_app().await;
    let charlie = login(&app.server, "charlie", DEMO_PASSWORD).await;
    let alice = login(&app.server, "alice", DEMO_PASSWORD).await;

    app.server
        .post("/auth/items")
        .add_header("Authorization", bearer(&charlie))
        .json(&json!({ "title": "Charlie's item" }))
        .await
        .assert_status(StatusCode::CREATED);

    let mine = app
        .server
        .get("/auth/users/me/items")
        .add_header("Authorization", bearer(&charlie))
        .await
        .json::<Value>();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["owner"], "charlie");

    let theirs = app
        .server
        .get("/auth/users/me/items")
        .add_header("Authorization", bearer(&alice))
        .await
        .json::<Value>();
    assert!(theirs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_requested_scopes_are_intersected() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/token")
        .form(&[
            ("username", "charlie"),
            ("password", DEMO_PASSWORD),
            ("scope", "items:read users:delete"),
        ])
        .await;
    response.assert_status_ok();
    let token = response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    app.server
        .post("/auth/items")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Nope" }))
        .await
        .assert_status_forbidden();

    app.server
        .get("/auth/users/me/items")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_role_check_on_get_account() {
    let app = spawn_app().await;
    let bob = login(&app.server, "bob", DEMO_PASSWORD).await;
    let alice = login(&app.server, "alice", DEMO_PASSWORD).await;

    let denied = app
        .server
        .get("/auth/users/charlie")
        .add_header("Authorization", bearer(&bob))
        .await;
    denied.assert_status_forbidden();
    assert_eq!(
        denied.json::<Value>()["error"]["message"],
        "Access denied. Required roles: admin"
    );

    app.server
        .get("/auth/users/charlie")
        .add_header("Authorization", bearer(&alice))
        .await
        .assert_status_ok();

    app.server
        .get("/auth/users/nobody")
        .add_header("Authorization", bearer(&alice))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_promote_to_manager_opens_dashboard() {
    let app = spawn_app().await;
    let alice = login(&app.server, "alice", DEMO_PASSWORD).await;

    let bob = login(&app.server, "bob", DEMO_PASSWORD).await;
    app.server
        .get("/auth/manager/dashboard")
        .add_header("Authorization", bearer(&bob))
        .await
        .assert_status_forbidden();

    let response = app
        .server
        .put("/auth/users/bob/role")
        .add_header("Authorization", bearer(&alice))
        .json(&json!({ "role": "manager" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["scopes"],
        json!(["users:read", "items:read", "items:write"])
    );

    let bob = login(&app.server, "bob", DEMO_PASSWORD).await;
    let dashboard = app
        .server
        .get("/auth/manager/dashboard")
        .add_header("Authorization", bearer(&bob))
        .await;
    dashboard.assert_status_ok();
    assert_eq!(dashboard.json::<Value>()["role"], "manager");
}

#[tokio::test]
async fn test_delete_account_rules() {
    let app = spawn_app().await;
    let alice = login(&app.server, "alice", DEMO_PASSWORD).await;

    let yourself = app
        .server
        .delete("/auth/users/alice")
        .add_header("Authorization", bearer(&alice))
        .await;
    yourself.assert_status_bad_request();
    assert_eq!(
        yourself.json::<Value>()["error"]["message"],
        "Cannot delete yourself"
    );

    app.server
        .delete("/auth/users/charlie")
        .add_header("Authorization", bearer(&alice))
        .await
        .assert_status_ok();

    app.server
        .delete("/auth/users/charlie")
        .add_header("Authorization", bearer(&alice))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_admin_actions_are_audited() {
    let app = spawn_app().await;
    let alice = login(&app.server, "alice", DEMO_PASSWORD).await;

    app.server
        .put("/auth/users/bob/role")
        .add_header("Authorization", bearer(&alice))
        .json(&json!({ "role": "manager" }))
        .await
        .assert_status_ok();
    app.server
        .delete("/auth/users/charlie")
        .add_header("Authorization", bearer(&alice))
        .await
        .assert_status_ok();

    let log = app.state.task_log.clone();
    eventually(|| {
        let log = log.clone();
        async move { log.len().await == 2 }
    })
    .await;

    let entries = app.state.task_log.recent(2).await;
    assert!(entries.iter().all(|e| e.kind == "audit"));
    assert_eq!(entries[0].message, "alice changed role of bob to manager");
    assert_eq!(entries[1].message, "alice deleted user charlie");
}

// ─── Refresh / logout ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let app = spawn_app().await;
    let pair = token_pair(&app.server, "bob").await;
    let old_refresh = pair["refresh_token"].as_str().unwrap();

    let rotated = app
        .server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": old_refresh }))
        .await;
    rotated.assert_status_ok();
    let new_refresh = rotated.json::<Value>()["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(new_refresh, old_refresh);

    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": old_refresh }))
        .await
        .assert_status_unauthorized();

    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": new_refresh }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = spawn_app().await;
    let pair = token_pair(&app.server, "bob").await;
    let access = pair["access_token"].as_str().unwrap();
    let refresh = pair["refresh_token"].as_str().unwrap();

    let response = app
        .server
        .post("/auth/logout")
        .add_header("Authorization", bearer(access))
        .json(&json!({ "refresh_token": refresh }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Successfully logged out"
    );

    app.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": refresh }))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_status_is_public() {
    let app = spawn_app().await;

    let response = app.server.get("/auth/status").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["accounts"], 4);
    assert_eq!(body["algorithm"], "HS256");
    assert_eq!(body["refresh_token_ttl_seconds"], 7 * 24 * 3600);
}

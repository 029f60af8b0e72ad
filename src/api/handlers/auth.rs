//! Handlers for registration, JWT issuance and scope/role protected routes.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::api::dto::auth::{
    AccountResponse, AuthStatusResponse, CreateItemRequest, RefreshTokenRequest, RegisterRequest,
    TokenForm, UpdateRoleRequest,
};
use crate::api::extract::{AppPath, ValidatedForm, ValidatedJson};
use crate::application::services::AuthContext;
use crate::application::services::auth_service::TokenPair;
use crate::domain::entities::account::{
    SCOPE_ITEMS_READ, SCOPE_ITEMS_WRITE, SCOPE_USERS_DELETE, SCOPE_USERS_READ,
};
use crate::domain::entities::{OwnedItem, Role};
use crate::domain::jobs::Job;
use crate::error::AppError;
use crate::state::AppState;

/// Queues an audit line for an administrative action; a full queue only logs.
fn audit(state: &AppState, message: String) {
    if let Err(e) = state.jobs.enqueue(Job::Audit { message }) {
        tracing::warn!(error = %e, "Audit entry dropped");
    }
}

/// `POST /auth/register`
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let account = state.auth_service.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// `POST /auth/token` (form: `username`, `password`, optional `scope`)
pub async fn token_handler(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<TokenForm>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state
        .auth_service
        .login(&form.username, &form.password, &form.scopes())
        .await?;
    Ok(Json(pair))
}

/// `POST /auth/refresh`; the presented refresh token is revoked.
pub async fn refresh_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, AppError> {
    Ok(Json(state.auth_service.refresh(&payload.refresh_token).await?))
}

/// `POST /auth/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .auth_service
        .logout(&ctx.account.username, &payload.refresh_token)
        .await?;
    Ok(Json(json!({ "message": "Successfully logged out" })))
}

/// `GET /auth/status`
pub async fn auth_status_handler(
    State(state): State<AppState>,
) -> Result<Json<AuthStatusResponse>, AppError> {
    let auth = &state.auth_service;

    Ok(Json(AuthStatusResponse {
        accounts: auth.account_count().await?,
        access_token_ttl_seconds: auth.access_ttl().num_seconds(),
        refresh_token_ttl_seconds: auth.refresh_ttl().num_seconds(),
        algorithm: "HS256",
    }))
}

/// `GET /auth/users/me`
pub async fn me_handler(Extension(ctx): Extension<AuthContext>) -> Json<AccountResponse> {
    Json(ctx.account.into())
}

/// `GET /auth/users/me/items` (scope `items:read`)
pub async fn my_items_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<OwnedItem>>, AppError> {
    ctx.require_scope(SCOPE_ITEMS_READ)?;
    Ok(Json(state.auth_service.items_for(&ctx.account.username).await))
}

/// `POST /auth/items` (scope `items:write`)
pub async fn create_item_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<OwnedItem>), AppError> {
    ctx.require_scope(SCOPE_ITEMS_WRITE)?;
    let item = state
        .auth_service
        .create_item(&ctx.account.username, payload.title)
        .await;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /auth/users` (scope `users:read`)
pub async fn list_accounts_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    ctx.require_scope(SCOPE_USERS_READ)?;
    let accounts = state.auth_service.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// `GET /auth/users/{username}` (role admin)
pub async fn get_account_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    AppPath(username): AppPath<String>,
) -> Result<Json<AccountResponse>, AppError> {
    ctx.require_role(&[Role::Admin])?;
    Ok(Json(state.auth_service.get_account(&username).await?.into()))
}

/// `PUT /auth/users/{username}/role` (role admin)
pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    AppPath(username): AppPath<String>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    ctx.require_role(&[Role::Admin])?;
    let account = state
        .auth_service
        .update_role(&username, payload.role)
        .await?;

    audit(
        &state,
        format!(
            "{} changed role of {username} to {}",
            ctx.account.username, account.role
        ),
    );
    Ok(Json(account.into()))
}

/// `DELETE /auth/users/{username}` (scope `users:delete`)
pub async fn delete_account_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    AppPath(username): AppPath<String>,
) -> Result<Json<Value>, AppError> {
    ctx.require_scope(SCOPE_USERS_DELETE)?;
    state
        .auth_service
        .delete_account(&ctx.account.username, &username)
        .await?;

    audit(&state, format!("{} deleted user {username}", ctx.account.username));
    Ok(Json(json!({ "message": format!("User {username} deleted successfully") })))
}

/// `GET /auth/manager/dashboard` (role admin or manager)
pub async fn manager_dashboard_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    ctx.require_role(&[Role::Admin, Role::Manager])?;

    Ok(Json(json!({
        "message": "Welcome to the manager dashboard",
        "user": ctx.account.username,
        "role": ctx.account.role,
        "total_users": state.auth_service.account_count().await?,
    })))
}

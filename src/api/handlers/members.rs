//! Handlers for the dependency-injection lesson.
//!
//! Dependencies are declared as extractor arguments: [`ApiKey`], [`Admin`],
//! [`NormalRate`], [`StrictRate`] and [`RequestContext`]. Axum resolves them in
//! argument order before the handler body runs.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::api::dependencies::{Admin, ApiKey, NormalRate, RequestContext, StrictRate};
use crate::api::dto::members::{
    CreateMemberRequest, DeleteMemberResponse, ListMembersQuery, MemberListResponse,
    RateLimitStatusResponse, TierStatus, UpdateMemberRequest,
};
use crate::api::extract::{AppPath, ClientIp, ValidatedJson, ValidatedQuery};
use crate::application::services::RateTier;
use crate::domain::entities::Member;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /di/users?skip&limit`
pub async fn list_members_handler(
    State(state): State<AppState>,
    ApiKey(caller): ApiKey,
    _rate: NormalRate,
    ValidatedQuery(query): ValidatedQuery<ListMembersQuery>,
) -> Result<Json<MemberListResponse>, AppError> {
    let (users, total) = state.member_service.list(query.skip, query.limit).await?;

    Ok(Json(MemberListResponse {
        users,
        total,
        skip: query.skip,
        limit: query.limit,
        requested_by: caller.name,
    }))
}

/// `GET /di/users/{id}`
pub async fn get_member_handler(
    State(state): State<AppState>,
    _caller: ApiKey,
    _rate: NormalRate,
    AppPath(id): AppPath<u64>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(state.member_service.get(id).await?))
}

/// `POST /di/users`
pub async fn create_member_handler(
    State(state): State<AppState>,
    ApiKey(caller): ApiKey,
    _rate: StrictRate,
    ValidatedJson(payload): ValidatedJson<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let member = state.member_service.create(payload.into()).await?;
    tracing::info!(id = member.id, by = %caller.name, "Member created");
    Ok((StatusCode::CREATED, Json(member)))
}

/// `PUT /di/users/{id}`
pub async fn update_member_handler(
    State(state): State<AppState>,
    _caller: ApiKey,
    AppPath(id): AppPath<u64>,
    ValidatedJson(payload): ValidatedJson<UpdateMemberRequest>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(state.member_service.update(id, payload.into()).await?))
}

/// `DELETE /di/users/{id}`; admin keys only.
pub async fn delete_member_handler(
    State(state): State<AppState>,
    Admin(admin): Admin,
    AppPath(id): AppPath<u64>,
) -> Result<Json<DeleteMemberResponse>, AppError> {
    state.member_service.delete(id).await?;

    Ok(Json(DeleteMemberResponse {
        message: format!("User {id} deleted successfully"),
        deleted_by: admin.name,
    }))
}

/// `GET /di/rate-limit-status`; reports capacity without spending a request.
pub async fn rate_limit_status_handler(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
) -> Json<RateLimitStatusResponse> {
    let limits = &state.rate_limit_service;

    let normal = TierStatus {
        limit: limits.limit(RateTier::Normal),
        remaining: limits.remaining(RateTier::Normal, &client).await,
    };
    let strict = TierStatus {
        limit: limits.limit(RateTier::Strict),
        remaining: limits.remaining(RateTier::Strict, &client).await,
    };

    Json(RateLimitStatusResponse {
        client,
        normal,
        strict,
        window_seconds: limits.window().as_secs(),
    })
}

/// `GET /di/stats`; admin keys only.
pub async fn member_stats_handler(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<Value>, AppError> {
    let stats = state.member_service.stats().await?;

    Ok(Json(json!({
        "total_users": stats.total_users,
        "api_keys_configured": state.api_key_service.key_count(),
        "users_by_domain": stats.users_by_domain,
    })))
}

/// `GET /di/learn/simple-dependency`
pub async fn simple_dependency_handler(ApiKey(caller): ApiKey) -> Json<Value> {
    Json(json!({
        "message": "Resolved a single dependency",
        "dependencies": ["api_key"],
        "caller": { "name": caller.name, "role": caller.role },
    }))
}

/// `GET /di/learn/multiple-dependencies`
pub async fn multiple_dependencies_handler(
    ApiKey(caller): ApiKey,
    NormalRate(remaining): NormalRate,
    context: RequestContext,
) -> Json<Value> {
    Json(json!({
        "message": "Resolved several independent dependencies",
        "dependencies": ["api_key", "rate_limit", "request_context"],
        "caller": { "name": caller.name, "role": caller.role },
        "rate_limit_remaining": remaining,
        "request": context,
    }))
}

/// `GET /di/learn/chained-dependencies`
pub async fn chained_dependencies_handler(Admin(admin): Admin) -> Json<Value> {
    Json(json!({
        "message": "Admin dependency resolved on top of the API key dependency",
        "dependencies": ["api_key", "admin"],
        "chain": "api_key -> admin",
        "admin": admin.name,
    }))
}

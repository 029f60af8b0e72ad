//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using a JWT access token from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access token>
/// ```
///
/// On success the resolved [`crate::application::services::AuthContext`] is
/// stored in the request extensions, where handlers pick it up with
/// `Extension<AuthContext>` and check scopes or roles.
///
/// # Errors
///
/// - `401 Unauthorized` when the header is missing, the token is invalid or
///   expired, a refresh token is presented, or the account no longer exists
/// - `400 Bad Request` when the account is disabled
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/users/me", get(me_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Not authenticated",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let context = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(context);

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

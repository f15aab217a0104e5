use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;

/// Id of the caller, inserted into request extensions when a token was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Applies the configured auth policy to every staff route
///
/// Installed unconditionally with `route_layer`; with `AuthPolicy::Disabled`
/// it lets requests through untouched.
///
/// Usage:
/// ```ignore
/// router.route_layer(axum::middleware::from_fn_with_state(state, enforce_auth_policy))
/// ```
pub async fn enforce_auth_policy(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.auth.authorize(authorization).map_err(|rejection| {
        tracing::warn!(
            path = %request.uri().path(),
            reason = %rejection,
            "Rejected unauthenticated staff request"
        );
        ApiError::unauthorized("Unauthorized").with_error(rejection)
    })?;

    if let Some(claims) = claims {
        request.extensions_mut().insert(AuthenticatedUser(claims.sub));
    }

    Ok(next.run(request).await)
}

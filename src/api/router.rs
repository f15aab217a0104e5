use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health, staff};
use crate::api::middleware::auth::enforce_auth_policy;
use crate::api::state::AppState;

/// Staff routes, guarded by the auth policy
///
/// Static segments take priority over `/:staff_id`, so `/getAll`,
/// `/permissions` and `/permissions/batch` never reach the id handlers.
pub fn staff_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/getAll", post(staff::get_all_staff))
        .route("/add", post(staff::add_staff))
        .route("/permissions", put(staff::update_permissions))
        .route("/permissions/batch", put(staff::batch_update_permissions))
        .route(
            "/:staff_id",
            put(staff::update_staff).delete(staff::delete_staff),
        )
        .route_layer(middleware::from_fn_with_state(state, enforce_auth_policy))
}

/// Builds the complete application router
///
/// # Arguments
/// * `state` - Shared repository and auth policy
/// * `prefix` - Mount point of the staff routes; empty mounts them at the root
pub fn build_router(state: AppState, prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let staff = staff_routes(state.clone());
    let router = Router::new().route("/health", get(health::health_check));
    let router = if prefix.is_empty() || prefix == "/" {
        router.merge(staff)
    } else {
        router.nest(prefix, staff)
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

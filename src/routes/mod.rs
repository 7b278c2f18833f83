//! Router assembly.

mod api;
mod common;

pub use api::api_routes;
pub use common::{common_routes, common_routes_with_ready};

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Full application: health routes plus the API, open to any origin, bodies capped at `max_body_bytes`.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(api_routes(state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

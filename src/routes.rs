use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/proposals", get(list_proposals))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

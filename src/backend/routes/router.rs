/**
 * Router Configuration
 *
 * Combines the store handlers into a single Axum router with permissive
 * CORS, so browser-hosted editors on any origin can reach the store.
 */

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::backend::diagram::handlers;
use crate::backend::server::state::AppState;
use crate::shared::protocol::{
    ADD_USER_PATH, GET_DIAGRAM_PATH, REMOVE_USER_PATH, SAVE_DIAGRAM_PATH, USER_BEACON_PATH,
    USER_COUNT_PATH,
};

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route(GET_DIAGRAM_PATH, get(handlers::get_diagram))
        .route(SAVE_DIAGRAM_PATH, post(handlers::save_diagram))
        .route(USER_COUNT_PATH, get(handlers::user_count))
        .route(ADD_USER_PATH, post(handlers::add_user))
        .route(REMOVE_USER_PATH, post(handlers::remove_user))
        .route(USER_BEACON_PATH, post(handlers::user_beacon))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

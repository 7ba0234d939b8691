/**
 * Server Initialization
 *
 * Creates the application state and assembles the router. The store starts
 * empty: no diagram and no participants.
 */

use axum::Router;

use crate::backend::routes::create_router;
use crate::backend::server::state::AppState;

/// Create the Axum application with fresh state
pub fn create_app() -> Router<()> {
    tracing::info!("Initializing diagram store server");
    create_app_with_state(AppState::new())
}

/// Create the Axum application around existing state
///
/// Callers that keep a clone of `state` can inspect the store while the
/// router serves requests.
pub fn create_app_with_state(app_state: AppState) -> Router<()> {
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}

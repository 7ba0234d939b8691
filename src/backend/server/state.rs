/**
 * Application State Management
 *
 * `AppState` is the central state container of the store server. It
 * implements `FromRef` so handlers can extract just the part they need.
 *
 * ```rust
 * use axum::extract::State;
 * use diagram_collab::backend::diagram::StoreState;
 *
 * async fn handler(State(store): State<StoreState>) -> String {
 *     format!("{} users", store.user_count().await)
 * }
 * ```
 */

use axum::extract::FromRef;

use crate::backend::diagram::StoreState;

/// Application state of the store server
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Shared diagram and participant count
    pub store: StoreState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromRef<AppState> for StoreState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

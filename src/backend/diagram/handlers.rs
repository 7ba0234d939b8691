/**
 * Diagram Store Handlers
 *
 * Axum handlers for the store endpoints. Responses are the flat JSON shapes
 * from `shared::protocol`; failures become `BackendError` JSON bodies.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::backend::diagram::state::StoreState;
use crate::backend::error::BackendError;
use crate::shared::{
    AbruptAction, AbruptSignal, DiagramResponse, SaveDiagramRequest, StatusAck, UserCountAck,
    UserCountResponse,
};

/// `GET /get-diagram`
pub async fn get_diagram(State(store): State<StoreState>) -> Json<DiagramResponse> {
    let diagram = store.diagram().await;
    tracing::debug!(
        "[Store] Serving diagram ({} bytes)",
        diagram.as_ref().map_or(0, String::len)
    );
    Json(DiagramResponse { diagram })
}

/// `POST /save-diagram`
pub async fn save_diagram(
    State(store): State<StoreState>,
    request: Result<Json<SaveDiagramRequest>, JsonRejection>,
) -> Result<Json<StatusAck>, BackendError> {
    let Json(request) = request?;
    tracing::debug!("[Store] Saving diagram ({} bytes)", request.new_diagram.len());
    store.save_diagram(request.new_diagram).await;
    Ok(Json(StatusAck {
        status: "Diagram saved".to_string(),
    }))
}

/// `GET /user-count`
pub async fn user_count(State(store): State<StoreState>) -> Json<UserCountResponse> {
    Json(UserCountResponse {
        user_count: store.user_count().await,
    })
}

/// `POST /add-user`
pub async fn add_user(State(store): State<StoreState>) -> Json<UserCountAck> {
    let user_count = store.add_user().await;
    tracing::info!("[Store] User joined ({} active)", user_count);
    Json(UserCountAck {
        status: "User added".to_string(),
        user_count,
    })
}

/// `POST /remove-user`
pub async fn remove_user(State(store): State<StoreState>) -> Json<UserCountAck> {
    let user_count = store.remove_user().await;
    tracing::info!("[Store] User left ({} active)", user_count);
    Json(UserCountAck {
        status: "User removed".to_string(),
        user_count,
    })
}

/// `POST /user-beacon`
///
/// Beacons are usually sent as `text/plain`, so the body is taken as raw text
/// and parsed here instead of through the `Json` extractor.
pub async fn user_beacon(
    State(store): State<StoreState>,
    body: String,
) -> Result<StatusCode, BackendError> {
    let signal = AbruptSignal::from_body(&body)?;
    match signal.action {
        AbruptAction::RemoveUser => {
            let user_count = store.remove_user().await;
            tracing::info!("[Store] User unloaded ({} active)", user_count);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

//! Wire Protocol Types
//!
//! Flat JSON payloads exchanged between sync clients and the diagram store.
//! Every endpoint of the store speaks one of these shapes; there are no
//! authentication headers, version fields or pagination.
//!
//! # Endpoints
//!
//! | Path | Method | Request | Response |
//! |------|--------|---------|----------|
//! | [`ADD_USER_PATH`] | POST | none | [`UserCountAck`] |
//! | [`REMOVE_USER_PATH`] | POST | none | [`UserCountAck`] |
//! | [`USER_BEACON_PATH`] | POST | [`AbruptSignal`] | 204, never read |
//! | [`USER_COUNT_PATH`] | GET | none | [`UserCountResponse`] |
//! | [`GET_DIAGRAM_PATH`] | GET | none | [`DiagramResponse`] |
//! | [`SAVE_DIAGRAM_PATH`] | POST | [`SaveDiagramRequest`] | [`StatusAck`] |

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

pub const ADD_USER_PATH: &str = "/add-user";
pub const REMOVE_USER_PATH: &str = "/remove-user";
pub const USER_BEACON_PATH: &str = "/user-beacon";
pub const USER_COUNT_PATH: &str = "/user-count";
pub const GET_DIAGRAM_PATH: &str = "/get-diagram";
pub const SAVE_DIAGRAM_PATH: &str = "/save-diagram";

/// Response of `GET /user-count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCountResponse {
    pub user_count: u64,
}

/// Acknowledgment of a session add/remove
///
/// Clients only care that the request succeeded; the count is informative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCountAck {
    pub status: String,
    pub user_count: u64,
}

/// Response of `GET /get-diagram`
///
/// `diagram` is `null` until the first write reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramResponse {
    pub diagram: Option<String>,
}

/// Body of `POST /save-diagram`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDiagramRequest {
    pub new_diagram: String,
}

/// Generic `{ "status": ... }` acknowledgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
}

/// Action carried by an abrupt teardown signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbruptAction {
    RemoveUser,
}

/// Fire-and-forget signal sent while the host is unloading
///
/// Serializes to `{ "action": "remove_user" }` and carries nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbruptSignal {
    pub action: AbruptAction,
}

impl AbruptSignal {
    pub const fn remove_user() -> Self {
        Self {
            action: AbruptAction::RemoveUser,
        }
    }

    /// Encode the signal as the JSON body a beacon transport sends
    pub fn to_body(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a beacon body
    ///
    /// Beacons usually arrive as `text/plain`, so this parses raw text
    /// rather than relying on the content type. The action is read as a plain
    /// string first so an unknown action is told apart from a broken body.
    pub fn from_body(body: &str) -> Result<Self, SharedError> {
        #[derive(Deserialize)]
        struct RawSignal {
            action: String,
        }

        let raw: RawSignal = serde_json::from_str(body)?;
        match raw.action.as_str() {
            "remove_user" => Ok(Self::remove_user()),
            _ => Err(SharedError::UnsupportedAction(raw.action)),
        }
    }
}

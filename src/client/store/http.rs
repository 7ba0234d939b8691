/**
 * HTTP Store Client
 *
 * Implements `RemoteStore` against the store server's flat JSON endpoints.
 * Every non-success status is turned into `StoreError::Status`; the engine
 * treats it exactly like a transport failure.
 */

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::client::config::Config;
use crate::client::error::StoreError;
use crate::client::store::RemoteStore;
use crate::shared::protocol::{
    ADD_USER_PATH, GET_DIAGRAM_PATH, REMOVE_USER_PATH, SAVE_DIAGRAM_PATH, USER_BEACON_PATH,
    USER_COUNT_PATH,
};
use crate::shared::{AbruptSignal, DiagramResponse, SaveDiagramRequest, SharedError, UserCountResponse};

/// reqwest-backed remote store
#[derive(Debug, Clone)]
pub struct HttpStore {
    config: Config,
    client: Client,
}

impl HttpStore {
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Map a non-success status to `StoreError::Status`
    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(StoreError::status(status.as_u16(), body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).map_err(SharedError::from)?)
    }

    async fn post_empty(&self, path: &str) -> Result<Response, StoreError> {
        let url = self.config.api_url(path);
        let response = self.client.post(&url).send().await?;
        Self::check(response).await
    }

    async fn get(&self, path: &str) -> Result<Response, StoreError> {
        let url = self.config.api_url(path);
        let response = self.client.get(&url).send().await?;
        Self::check(response).await
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn add_session(&self) -> Result<(), StoreError> {
        self.post_empty(ADD_USER_PATH).await?;
        Ok(())
    }

    async fn remove_session(&self) -> Result<(), StoreError> {
        self.post_empty(REMOVE_USER_PATH).await?;
        Ok(())
    }

    async fn session_count(&self) -> Result<u64, StoreError> {
        let response = self.get(USER_COUNT_PATH).await?;
        let body: UserCountResponse = Self::decode(response).await?;
        Ok(body.user_count)
    }

    async fn read_document(&self) -> Result<Option<String>, StoreError> {
        let response = self.get(GET_DIAGRAM_PATH).await?;
        let body: DiagramResponse = Self::decode(response).await?;
        Ok(body.diagram)
    }

    async fn write_document(&self, text: &str) -> Result<(), StoreError> {
        let url = self.config.api_url(SAVE_DIAGRAM_PATH);
        let request = SaveDiagramRequest {
            new_diagram: text.to_string(),
        };
        let response = self.client.post(&url).json(&request).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn signal_abrupt(&self, signal: AbruptSignal) -> Result<(), StoreError> {
        let url = self.config.api_url(USER_BEACON_PATH);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "text/plain;charset=UTF-8")
            .body(signal.to_body()?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

//! HTTP implementation of [`ConversationSource`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET conversations` → `{"conversations": [...]}`
//! - `GET conversations/{id}` → one conversation, `404` when it does not exist

use async_trait::async_trait;
use chatdesk_core::config::BackendConfig;
use chatdesk_core::conversation::{ConversationList, ConversationSource, RawConversation};
use chatdesk_core::error::{ChatdeskError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

const CONVERSATIONS_SEGMENT: &str = "conversations";

/// Conversation source backed by the chat backend's REST API.
#[derive(Clone)]
pub struct HttpConversationSource {
    client: Client,
    base_url: Url,
}

impl HttpConversationSource {
    /// Creates a source from backend configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or cannot be
    /// used as a base (e.g. `mailto:`), or if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ChatdeskError::config(format!(
                "backend URL cannot be a base: {}",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ChatdeskError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(CONVERSATIONS_SEGMENT);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }
}

#[async_trait]
impl ConversationSource for HttpConversationSource {
    async fn list_conversations(&self) -> Result<ConversationList> {
        let url = self.endpoint(None);
        tracing::debug!("[HttpConversationSource] GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let list: ConversationList = response.json().await.map_err(map_reqwest_error)?;
        tracing::debug!(
            "[HttpConversationSource] Listed {} conversations",
            list.conversations.len()
        );
        Ok(list)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<RawConversation>> {
        let url = self.endpoint(Some(id));
        tracing::debug!("[HttpConversationSource] GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let conversation: RawConversation = response.json().await.map_err(map_reqwest_error)?;
        Ok(Some(conversation))
    }
}

async fn status_error(status: StatusCode, response: reqwest::Response) -> ChatdeskError {
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unexpected status").to_string()
    } else {
        body
    };
    ChatdeskError::http(status.as_u16(), message)
}

/// Maps a reqwest failure onto the shared error taxonomy.
pub fn map_reqwest_error(err: reqwest::Error) -> ChatdeskError {
    if err.is_decode() {
        ChatdeskError::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        ChatdeskError::http(status.as_u16(), err.to_string())
    } else {
        ChatdeskError::transport(err.to_string())
    }
}

//! Transport stage of the chat stream
//!
//! [`ChatTransport`] issues the chat request and hands back the raw body as
//! a stream of byte chunks. [`HttpChatTransport`] talks to the real backend.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeeseaError};

/// Path of the streaming chat endpoint, relative to the API base URL
pub const CHAT_STREAM_PATH: &str = "/api/v1/chat/stream";

/// Raw response body as it arrives from the network
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// JSON body of a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub message: String,
    /// Identifier of this stream session
    pub session_id: String,
}

/// Opens a chat stream
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    /// Send `request` and return the response body
    ///
    /// # Errors
    ///
    /// Returns [`SeeseaError::ChatTransport`] if the request cannot be sent
    /// or the backend answers with a non-success status.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream>;
}

/// Chat transport over HTTP
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    http_client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpChatTransport {
    /// Build a transport for the chat API rooted at `base_url`
    ///
    /// Only the connect phase is bounded by `connect_timeout`; the response
    /// body may stream for as long as the backend keeps it open.
    ///
    /// # Errors
    ///
    /// Returns [`SeeseaError::Config`] if `base_url` does not form a valid
    /// URL, or [`SeeseaError::Http`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use seesea::chat::HttpChatTransport;
    ///
    /// let transport = HttpChatTransport::new("http://localhost:8001", Duration::from_secs(5)).unwrap();
    /// assert_eq!(transport.endpoint().as_str(), "http://localhost:8001/api/v1/chat/stream");
    /// ```
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        let endpoint = endpoint_url(base_url, CHAT_STREAM_PATH)?;
        let http_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(SeeseaError::Http)?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Full URL of the chat stream endpoint
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpChatTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream> {
        tracing::debug!(session_id = %request.session_id, "Opening chat stream");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| SeeseaError::ChatTransport(format!("HTTP POST failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeeseaError::ChatTransport(format!(
                "HTTP error! status: {}",
                status.as_u16()
            ))
            .into());
        }

        let body = response
            .bytes_stream()
            .map_err(|e| anyhow::Error::from(SeeseaError::Http(e)));
        Ok(Box::pin(body))
    }
}

/// Join an API path onto a base URL, keeping any path prefix of the base
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<url::Url> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    url::Url::parse(&joined).map_err(|e| {
        SeeseaError::Config(format!("Invalid API base URL '{}': {}", base_url, e)).into()
    })
}

#[cfg(test)]
pub mod fake;

//! Scripted chat transport for unit tests
//!
//! [`ScriptedTransport`] answers each request with the next
//! [`ScriptedResponse`]: a body split into chunks, a body that breaks off
//! with a read error, or a rejected status.

use std::sync::Mutex;

use bytes::Bytes;

use super::{ByteStream, ChatRequest, ChatTransport};
use crate::error::{Result, SeeseaError};

/// What a [`ScriptedTransport`] does with the next request
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Stream these chunks, then end normally
    Chunks(Vec<Bytes>),
    /// Stream these chunks, then fail the read
    ChunksThenError(Vec<Bytes>, String),
    /// Reject the request with this HTTP status
    Status(u16),
}

impl ScriptedResponse {
    /// Stream `body` split into chunks of at most `chunk_size` bytes
    pub fn chunked(body: &[u8], chunk_size: usize) -> Self {
        ScriptedResponse::Chunks(
            body.chunks(chunk_size.max(1))
                .map(Bytes::copy_from_slice)
                .collect(),
        )
    }
}

/// In-process transport replaying scripted responses
///
/// Responses are consumed in order, one per request. Every request is
/// recorded so tests can assert on what was sent.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<Vec<ScriptedResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    /// Create a transport that will answer with `responses`, in order
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ChatTransport for ScriptedTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop());

        match next {
            Some(ScriptedResponse::Chunks(chunks)) => Ok(Box::pin(futures::stream::iter(
                chunks.into_iter().map(Ok::<Bytes, anyhow::Error>),
            ))),
            Some(ScriptedResponse::ChunksThenError(chunks, message)) => {
                let items: Vec<Result<Bytes>> = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(SeeseaError::ChatTransport(message).into())))
                    .collect();
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(ScriptedResponse::Status(status)) => Err(SeeseaError::ChatTransport(format!(
                "HTTP error! status: {}",
                status
            ))
            .into()),
            None => Err(SeeseaError::ChatTransport("no scripted response left".into()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_scripted_transport_replays_in_order() {
        let transport = ScriptedTransport::new(vec![
            ScriptedResponse::chunked(b"abcdef", 4),
            ScriptedResponse::Status(502),
        ]);
        let request = ChatRequest {
            message: "q".into(),
            session_id: "s".into(),
        };

        let chunks: Vec<Bytes> = transport
            .open_stream(&request)
            .await
            .unwrap()
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert_eq!(chunks, vec![Bytes::from("abcd"), Bytes::from("ef")]);

        let err = match transport.open_stream(&request).await {
            Ok(_) => panic!("expected scripted status failure"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("502"));
        assert_eq!(transport.requests().len(), 2);
    }
}

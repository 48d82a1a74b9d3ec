//! Application stage of the chat stream
//!
//! [`ChatSession`] owns a [`Conversation`] and turns each submitted question
//! into one streamed exchange: a user message, an AI placeholder, a request,
//! and in-place updates of the placeholder as deltas arrive.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::conversation::{Conversation, MessageId};
use super::stream::{consume_event_stream, StreamObserver, StreamSummary};
use super::transport::{ChatRequest, ChatTransport};

/// Shown when the request fails or the stream breaks
pub const CONNECTION_FAILED_NOTICE: &str =
    "❌ Connection failed, please make sure the chat API is running";

/// Shown when a stream ends without any content
pub const NO_RESPONSE_NOTICE: &str = "Sorry, no response was received";

/// Prefix of the notice shown for a backend `error` event
pub const ERROR_NOTICE_PREFIX: &str = "Error: ";

/// How one submitted question ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stream delivered at least one content delta
    Answered(StreamSummary),
    /// The stream ended normally without content
    NoResponse(StreamSummary),
    /// The request failed or the stream broke off
    ConnectionFailed,
}

/// Result of [`ChatSession::send_message`] for a non-empty question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Stream session identifier sent to the backend
    pub session_id: String,
    /// The user message that was appended
    pub user_message: MessageId,
    /// The AI message that received the answer
    pub ai_message: MessageId,
    /// How the exchange ended
    pub outcome: TurnOutcome,
}

/// Live change to the AI placeholder, for callers rendering as they go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnUpdate<'a> {
    /// New text appended to the answer
    Delta(&'a str),
    /// The answer was replaced by a notice
    Notice(&'a str),
}

/// One chat window: a conversation plus the transport it talks through
#[derive(Debug)]
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    conversation: Conversation,
    session_prefix: String,
}

impl ChatSession {
    /// Create a session with an empty conversation
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self::with_conversation(transport, Conversation::new())
    }

    /// Create a session continuing `conversation`
    pub fn with_conversation(transport: Arc<dyn ChatTransport>, conversation: Conversation) -> Self {
        Self {
            transport,
            conversation,
            session_prefix: "user-session-".to_string(),
        }
    }

    /// Use a different prefix for generated session identifiers
    pub fn with_session_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.session_prefix = prefix.into();
        self
    }

    /// The conversation so far
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Submit a question and stream the answer into the conversation
    ///
    /// Returns `None` without touching the conversation or the network when
    /// `text` is empty after trimming. Failures never escape: they end up as
    /// a notice on the AI placeholder.
    pub async fn send_message(&mut self, text: &str) -> Option<Turn> {
        self.send_message_with(text, |_| {}).await
    }

    /// Like [`send_message`](Self::send_message), reporting every change to
    /// the AI placeholder through `on_update` as it happens
    pub async fn send_message_with<F>(&mut self, text: &str, mut on_update: F) -> Option<Turn>
    where
        F: FnMut(TurnUpdate<'_>),
    {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }

        let user_message = self.conversation.push_user(message);
        let ai_message = self.conversation.push_ai_placeholder();
        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.next_session_id(),
        };

        tracing::info!(session_id = %request.session_id, "Sending chat message");

        let mut writer = PlaceholderWriter {
            conversation: &mut self.conversation,
            message: ai_message,
            on_update: &mut on_update,
        };

        let outcome = match self.transport.open_stream(&request).await {
            Ok(body) => match consume_event_stream(body, &mut writer).await {
                Ok(summary) if summary.content.is_empty() => TurnOutcome::NoResponse(summary),
                Ok(summary) => TurnOutcome::Answered(summary),
                Err(e) => {
                    tracing::error!("Chat error: {:#}", e);
                    writer.notice(CONNECTION_FAILED_NOTICE);
                    TurnOutcome::ConnectionFailed
                }
            },
            Err(e) => {
                tracing::error!("Chat error: {:#}", e);
                writer.notice(CONNECTION_FAILED_NOTICE);
                TurnOutcome::ConnectionFailed
            }
        };

        Some(Turn {
            session_id: request.session_id,
            user_message,
            ai_message,
            outcome,
        })
    }

    fn next_session_id(&self) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}{}-{}",
            self.session_prefix,
            Utc::now().timestamp_millis(),
            &suffix[..8]
        )
    }
}

/// Mirrors stream events onto the AI placeholder message
struct PlaceholderWriter<'a, F> {
    conversation: &'a mut Conversation,
    message: MessageId,
    on_update: &'a mut F,
}

impl<F> PlaceholderWriter<'_, F>
where
    F: FnMut(TurnUpdate<'_>),
{
    fn notice(&mut self, text: &str) {
        self.conversation.replace_ai_content(self.message, text);
        (self.on_update)(TurnUpdate::Notice(text));
    }
}

impl<F> StreamObserver for PlaceholderWriter<'_, F>
where
    F: FnMut(TurnUpdate<'_>),
{
    fn on_delta(&mut self, delta: &str, accumulated: &str) {
        self.conversation
            .replace_ai_content(self.message, accumulated);
        (self.on_update)(TurnUpdate::Delta(delta));
    }

    fn on_error(&mut self, error: &str) {
        self.notice(&format!("{}{}", ERROR_NOTICE_PREFIX, error));
    }

    fn on_done(&mut self, summary: &StreamSummary) {
        if summary.content.is_empty() {
            self.notice(NO_RESPONSE_NOTICE);
        }
    }
}

//! Streaming chat with the SeeSea assistant
//!
//! - `conversation`: messages and the in-place AI placeholder
//! - `stream`: incremental SSE framing and payload dispatch
//! - `transport`: HTTP source of the response body (plus a scripted fake in tests)
//! - `session`: ties the three together for one chat window

pub mod conversation;
pub mod session;
pub mod stream;
pub mod transport;

pub use conversation::{Conversation, Message, MessageId, Role};
pub use session::{
    ChatSession, Turn, TurnOutcome, TurnUpdate, CONNECTION_FAILED_NOTICE, ERROR_NOTICE_PREFIX,
    NO_RESPONSE_NOTICE,
};
pub use stream::{consume_event_stream, StreamObserver, StreamSummary};
pub use transport::{ByteStream, ChatRequest, ChatTransport, HttpChatTransport};

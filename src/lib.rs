//! SeeSea - shipping intelligence client library
//!
//! This library provides the client side of the SeeSea backends: a
//! streaming chat consumer for the AI assistant and a vessel statistics
//! client for maritime chokepoints.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Conversation model, SSE stream consumer, transports, sessions
//! - `vessels`: Chokepoint catalog, vessel statistics client and summaries
//! - `drag`: Drag-to-move state for floating panels
//! - `config`: Configuration management
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and its handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use seesea::chat::{ChatSession, HttpChatTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transport = HttpChatTransport::new("http://localhost:8001", Duration::from_secs(10))?;
//!     let mut session = ChatSession::new(Arc::new(transport));
//!     if let Some(turn) = session.send_message("How busy is the Suez Canal?").await {
//!         let answer = session.conversation().get(turn.ai_message);
//!         println!("{:?}", answer.map(|m| &m.content));
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod drag;
pub mod error;
pub mod vessels;

// Re-export commonly used types
pub use chat::{ChatSession, Conversation, Message, Role};
pub use config::Config;
pub use error::{Result, SeeseaError};
pub use vessels::{Chokepoint, DateRange, VesselClient, VesselSummary};

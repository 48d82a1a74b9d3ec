//! Conversation history for the chat widget
//!
//! A [`Conversation`] is append-only with one exception: the content of an
//! AI placeholder message is replaced while its answer streams in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the assistant (or a notice standing in for it)
    Ai,
}

/// Stable identity of a message within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identity used to address the message for in-place updates
    pub id: MessageId,
    /// Author role, fixed at creation
    pub role: Role,
    /// Text content
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Ordered list of messages shown in one chat window
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation that opens with an AI greeting
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::chat::{Conversation, Role};
    ///
    /// let conversation = Conversation::with_greeting("Hello!");
    /// assert_eq!(conversation.len(), 1);
    /// assert_eq!(conversation.messages()[0].role, Role::Ai);
    /// ```
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push_ai_placeholder_with(greeting);
        conversation
    }

    /// Append a user message and return its id
    pub fn push_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Message::new(Role::User, content))
    }

    /// Append an empty AI message to be filled by a stream
    pub fn push_ai_placeholder(&mut self) -> MessageId {
        self.push_ai_placeholder_with(String::new())
    }

    fn push_ai_placeholder_with(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Message::new(Role::Ai, content))
    }

    fn push(&mut self, message: Message) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Replace the content of an AI message
    ///
    /// User messages are immutable; attempting to overwrite one (or an
    /// unknown id) leaves the conversation untouched and returns `false`.
    pub fn replace_ai_content(&mut self, id: MessageId, content: impl Into<String>) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.role == Role::Ai)
        {
            Some(message) => {
                message.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Look up a message by id
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recently appended message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true when there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

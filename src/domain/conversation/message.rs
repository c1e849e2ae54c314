//! Message entity and the append-only conversation history.
//!
//! Messages are immutable records of user/assistant exchanges. The history
//! keeps them in timestamp order and refuses anything that would break it.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::thresholds::messages::MAX_CONTENT_CHARS;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Instructions for the generation service.
    System,
    /// The person being counseled.
    User,
    /// The counselor.
    Assistant,
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `content` is non-blank and at most 5000 characters (validated at construction)
/// - `created_at` never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    created_at: Timestamp,
}

impl Message {
    /// Creates a new message stamped with the current time.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is blank
    /// - `ContentTooLong` if content exceeds the character limit
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, DomainError> {
        Self::at(role, content, Timestamp::now())
    }

    /// Creates a new message with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Same as [`Message::new`].
    pub fn at(
        role: Role,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: MessageId::new(),
            role,
            content,
            created_at,
        })
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::Assistant, content)
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::System, content)
    }

    /// Reconstitutes a message from stored records (no validation).
    pub fn reconstitute(
        id: MessageId,
        role: Role,
        content: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            role,
            content,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Returns true if this message is from the assistant.
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }
        let chars = content.chars().count();
        if chars > MAX_CONTENT_CHARS {
            return Err(DomainError::new(
                ErrorCode::ContentTooLong,
                format!(
                    "Message content is {} characters, limit is {}",
                    chars, MAX_CONTENT_CHARS
                ),
            )
            .with_detail("field", "content"));
        }
        Ok(())
    }
}

/// Append-only, timestamp-ordered list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from existing messages, checking their order.
    ///
    /// # Errors
    ///
    /// - `MessageOutOfOrder` if any message is older than its predecessor
    pub fn from_messages(messages: Vec<Message>) -> Result<Self, DomainError> {
        let mut history = Self::new();
        for message in messages {
            history.append(message)?;
        }
        Ok(history)
    }

    /// Appends a message.
    ///
    /// # Errors
    ///
    /// - `MessageOutOfOrder` if the message predates the last one
    pub fn append(&mut self, message: Message) -> Result<(), DomainError> {
        if let Some(last) = self.messages.last() {
            if message.created_at().is_before(last.created_at()) {
                return Err(DomainError::new(
                    ErrorCode::MessageOutOfOrder,
                    "Message is older than the last message in the conversation",
                )
                .with_detail("message_id", message.id().to_string()));
            }
        }
        self.messages.push(message);
        Ok(())
    }

    /// Returns all messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterates over user messages in order.
    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_user())
    }

    /// Returns the most recent user message, if any.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

//! Text Generator Port - Interface for the model that writes counselor replies.
//!
//! The engine decides what to ask and how; the generator turns the assembled
//! system prompt and conversation into the reply text, which may end with
//! the completion judgment JSON.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoGenerator;
//!
//! #[async_trait]
//! impl TextGenerator for EchoGenerator {
//!     async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
//!         Ok(GenerationResponse::new(request.system_prompt, "echo"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Message, Role};
use crate::domain::foundation::SessionId;

/// Port for reply generation.
///
/// Implementations connect to an external model service and translate
/// between its API and these types.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate one reply for the request.
    async fn generate(&self, request: GenerationRequest)
        -> Result<GenerationResponse, GenerationError>;
}

/// Request for a counselor reply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Session the turn belongs to, for tracing.
    pub session_id: SessionId,
    /// Assembled system prompt.
    pub system_prompt: String,
    /// Conversation so far, oldest first.
    pub messages: Vec<PromptMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(session_id: SessionId, system_prompt: impl Into<String>) -> Self {
        Self {
            session_id,
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Appends the conversation history. System messages are skipped; the
    /// system prompt replaces them.
    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.messages.extend(
            history
                .iter()
                .filter(|m| m.role() != Role::System)
                .map(PromptMessage::from),
        );
        self
    }

    pub fn with_message(mut self, role: Role, content: impl Into<String>) -> Self {
        self.messages.push(PromptMessage {
            role,
            content: content.into(),
        });
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A message as sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for PromptMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

/// Generated reply.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Raw reply text, possibly ending with the judgment JSON.
    pub content: String,
    /// Model that produced it.
    pub model: String,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
}

impl GenerationResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            finish_reason: FinishReason::Stop,
        }
    }

    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop.
    Stop,
    /// Hit max_tokens; the judgment JSON may be cut off.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
}

/// Generator errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by the service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Service unavailable.
    #[error("generator unavailable: {message}")]
    Unavailable { message: String },

    /// The service refused the content.
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Network failure.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl GenerationError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable { .. } | Self::Network(_) | Self::Timeout { .. }
        )
    }
}

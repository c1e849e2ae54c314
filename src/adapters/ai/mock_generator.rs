//! Mock text generator for testing.
//!
//! Returns queued replies in order, records every request, and can inject
//! errors or latency so handlers are testable without a model service.
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_reply("I hear you.")
//!     .with_delay(Duration::from_millis(50));
//!
//! let response = generator.generate(request).await?;
//! assert_eq!(response.content, "I hear you.");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    FinishReason, GenerationError, GenerationRequest, GenerationResponse, TextGenerator,
};

const MOCK_MODEL: &str = "mock-counselor-1";
const DEFAULT_REPLY: &str = "Mock reply";

/// Mock generator for testing.
#[derive(Debug, Clone, Default)]
pub struct MockTextGenerator {
    /// Queued outcomes, consumed in order.
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Every request received.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

/// A queued mock outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Success {
        content: String,
        finish_reason: FinishReason,
    },
    Error(GenerationError),
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.with_reply_full(content, FinishReason::Stop)
    }

    /// Queues a reply with an explicit finish reason.
    pub fn with_reply_full(self, content: impl Into<String>, finish_reason: FinishReason) -> Self {
        lock(&self.replies).push_back(MockReply::Success {
            content: content.into(),
            finish_reason,
        });
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        lock(&self.replies).push_back(MockReply::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn next_reply(&self) -> MockReply {
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::Success {
                content: DEFAULT_REPLY.to_string(),
                finish_reason: FinishReason::Stop,
            })
    }
}

/// Recovers the guard from a poisoned lock; the queues stay usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockReply::Success {
                content,
                finish_reason,
            } => Ok(GenerationResponse::new(content, MOCK_MODEL).with_finish_reason(finish_reason)),
            MockReply::Error(err) => Err(err),
        }
    }
}

//! The end-of-conversation judgment returned by the model.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UnitScore;
use crate::domain::thresholds::completion::CONFIDENCE_FLOOR;

/// A validated completion judgment.
///
/// `resolved` is only ever true when the model claimed resolution with a
/// confidence at or above the floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionDecision {
    resolved: bool,
    confidence: UnitScore,
    next_action: String,
    reasoning: String,
}

impl CompletionDecision {
    /// Builds a decision, applying the confidence floor to the claimed flag.
    pub fn new(
        claimed_resolved: bool,
        confidence: UnitScore,
        next_action: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            resolved: claimed_resolved && confidence.value() >= CONFIDENCE_FLOOR,
            confidence,
            next_action: next_action.into(),
            reasoning: reasoning.into(),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn confidence(&self) -> UnitScore {
        self.confidence
    }

    /// Closing message when resolved, a follow-up question otherwise.
    pub fn next_action(&self) -> &str {
        &self.next_action
    }

    /// Internal rationale. Never shown to the user.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

/// The JSON object exactly as the model is asked to emit it.
#[derive(Debug, Deserialize)]
pub(super) struct WireDecision {
    pub resolved: bool,
    pub confidence: f64,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(rename = "_reasoning", default)]
    pub reasoning: Option<String>,
}

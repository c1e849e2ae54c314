//! Psychological-safety constants.
//!
//! Every tunable number the engine scores against lives here so that the
//! calculator, the stage controller, and the question generator agree.

use serde::{Deserialize, Serialize};

/// Weights of the three Rogers conditions in the overall score. They sum to 1.0.
pub mod weights {
    pub const SELF_CONGRUENCE: f64 = 0.25;
    pub const UNCONDITIONAL_POSITIVE_REGARD: f64 = 0.45;
    pub const EMPATHIC_UNDERSTANDING: f64 = 0.30;
}

/// Band boundaries for the overall safety score.
pub mod safety {
    /// Below this the conversation needs recovery.
    pub const LOW: f64 = 0.4;
    /// Gate for the warmup and closing stages.
    pub const MEDIUM: f64 = 0.6;
    pub const HIGH: f64 = 0.7;
    pub const EXCELLENT: f64 = 0.8;
}

/// Engagement scoring for a single user response.
pub mod engagement {
    pub const WORD_COUNT_WEIGHT: f64 = 0.4;
    pub const WORD_COUNT_DIVISOR: f64 = 50.0;
    pub const POSITIVE_LANGUAGE_WEIGHT: f64 = 0.3;
    pub const POSITIVE_MARKER_STEP: f64 = 0.1;
    pub const ENGAGEMENT_PATTERN_BONUS: f64 = 0.2;
    pub const RESISTANCE_PENALTY: f64 = -0.3;
    pub const DETAILED_RESPONSE_BONUS: f64 = 0.1;
    /// Word count above which a response counts as detailed.
    pub const DETAILED_RESPONSE_THRESHOLD: usize = 30;
}

/// Engagement trend across recent turns.
pub mod trend {
    /// Number of prior turns considered.
    pub const WINDOW: usize = 3;
    /// Contribution of the trend to the overall score.
    pub const WEIGHT: f64 = 0.1;
    /// Trend used on the first scored turn.
    pub const FIRST_TURN: f64 = 0.7;
}

/// Completion-detection limits.
pub mod completion {
    /// A decision resolves only at or above this confidence.
    pub const CONFIDENCE_FLOOR: f64 = 0.8;
    /// Raw model output longer than this many bytes is rejected.
    pub const MAX_RAW_BYTES: usize = 100_000;
}

/// Choice-question shape limits.
pub mod questions {
    pub const SCALE_MIN: u8 = 1;
    pub const SCALE_MAX: u8 = 5;
    pub const MIN_OPTIONS: usize = 2;
    pub const MAX_OPTIONS: usize = 10;
    /// How many of the latest previous topics are avoided.
    pub const RECENT_TOPIC_WINDOW: usize = 3;
}

/// Reply token budget.
pub mod tokens {
    pub const MIN_REPLY: u32 = 300;
    pub const MAX_REPLY: u32 = 1000;
    /// Context tokens at which the budget reaches the stage baseline.
    pub const CONTEXT_UNIT: f64 = 1000.0;
    pub const MAX_CONTEXT_MULTIPLIER: f64 = 1.5;
    /// Conversations shorter than this many messages get extra room.
    pub const EARLY_MESSAGE_COUNT: usize = 5;
    pub const EARLY_FACTOR: f64 = 1.2;
    /// Rough characters-per-word and tokens-per-word ratios.
    pub const CHARS_PER_WORD: f64 = 5.0;
    pub const TOKENS_PER_WORD: f64 = 0.75;
}

/// Message content limits.
pub mod messages {
    pub const MAX_CONTENT_CHARS: usize = 5000;
}

/// Qualitative band of an overall safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Low,
    Medium,
    High,
    Excellent,
}

impl SafetyLevel {
    /// Classifies an overall score.
    pub fn from_score(overall: f64) -> Self {
        if overall >= safety::EXCELLENT {
            Self::Excellent
        } else if overall >= safety::HIGH {
            Self::High
        } else if overall >= safety::LOW {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns a short label for prompts and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Excellent => "excellent",
        }
    }
}

//! Conversation stages.
//!
//! A counseling conversation moves from light rapport-building to deeper
//! exploration and finally to a wrap-up. The stage decides how much
//! structure the counselor offers and how safe the user must feel first.

use crate::domain::thresholds::safety;
use serde::{Deserialize, Serialize};

/// Stage of a counseling conversation.
///
/// Stages are ordered `Warmup` → `Exploration` → `DeepDive` → `Closing`.
/// There is no stored stage: the controller recomputes it every turn from
/// the question count and the safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// Rapport building with easy, mostly closed questions.
    Warmup,
    /// Broadening out to the user's situation.
    Exploration,
    /// Working through the core concern.
    DeepDive,
    /// Summarizing and wrapping up.
    Closing,
}

impl ConversationStage {
    /// All stages in progression order.
    pub const ALL: [ConversationStage; 4] = [
        Self::Warmup,
        Self::Exploration,
        Self::DeepDive,
        Self::Closing,
    ];

    /// Returns the stage name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Exploration => "exploration",
            Self::DeepDive => "deep_dive",
            Self::Closing => "closing",
        }
    }

    /// Returns the counselor's directive for this stage.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Warmup => {
                "Build rapport. Keep questions light and easy to answer; offer choices."
            }
            Self::Exploration => {
                "Explore the user's situation and feelings. Mix choices with gentle open questions."
            }
            Self::DeepDive => {
                "Work through the core concern. Reflect feelings back and invite the user's own words."
            }
            Self::Closing => {
                "Summarize what was shared, acknowledge the user's effort, and check what they take away."
            }
        }
    }

    /// Default fraction of turns that use a choice question.
    pub fn default_choice_ratio(&self) -> f64 {
        match self {
            Self::Warmup => 0.8,
            Self::Exploration => 0.6,
            Self::DeepDive => 0.4,
            Self::Closing => 0.7,
        }
    }

    /// Minimum overall safety score required to run this stage.
    pub fn safety_threshold(&self) -> f64 {
        match self {
            Self::Warmup => safety::MEDIUM,
            Self::Exploration => 0.5,
            Self::DeepDive => safety::LOW,
            Self::Closing => safety::MEDIUM,
        }
    }

    /// Returns the previous stage, or `None` for warmup.
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Warmup => None,
            Self::Exploration => Some(Self::Warmup),
            Self::DeepDive => Some(Self::Exploration),
            Self::Closing => Some(Self::DeepDive),
        }
    }
}

impl Default for ConversationStage {
    fn default() -> Self {
        Self::Warmup
    }
}

impl std::fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stage_basics {
        use super::*;

        #[test]
        fn default_stage_is_warmup() {
            assert_eq!(ConversationStage::default(), ConversationStage::Warmup);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&ConversationStage::DeepDive).unwrap();
            assert_eq!(json, "\"deep_dive\"");
        }

        #[test]
        fn deserializes_from_snake_case() {
            let stage: ConversationStage = serde_json::from_str("\"closing\"").unwrap();
            assert_eq!(stage, ConversationStage::Closing);
        }

        #[test]
        fn every_stage_has_a_directive() {
            for stage in ConversationStage::ALL {
                assert!(!stage.directive().is_empty());
            }
        }

        #[test]
        fn display_matches_wire_name() {
            assert_eq!(ConversationStage::DeepDive.to_string(), "deep_dive");
        }

        #[test]
        fn choice_ratio_does_not_increase_until_deep_dive() {
            let ratios: Vec<f64> = [
                ConversationStage::Warmup,
                ConversationStage::Exploration,
                ConversationStage::DeepDive,
            ]
            .iter()
            .map(|s| s.default_choice_ratio())
            .collect();
            assert!(ratios.windows(2).all(|w| w[0] >= w[1]));
        }

        #[test]
        fn previous_walks_back_to_warmup() {
            assert_eq!(ConversationStage::Closing.previous(), Some(ConversationStage::DeepDive));
            assert_eq!(ConversationStage::Exploration.previous(), Some(ConversationStage::Warmup));
            assert_eq!(ConversationStage::Warmup.previous(), None);
        }
    }
}

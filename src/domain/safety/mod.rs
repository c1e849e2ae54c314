//! Psychological safety scoring.

mod analysis;
mod calculator;
mod recovery;

pub use analysis::{analyze_response, word_count, Expression, ResponseAnalysis, Sentiment, Topic};
pub use calculator::{
    EmpathicUnderstanding, PositiveRegard, RogersConditions, SafetyAssessment, SafetyScore,
    SafetyScoreCalculator, SafetyScoreComponents, ScoringWeights, SelfCongruence,
};
pub use recovery::{recovery_actions, RecoveryAction, RecoveryKind, RecoveryTrigger};

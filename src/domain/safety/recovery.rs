//! Recovery actions for conversations that feel unsafe.

use super::analysis::{Expression, ResponseAnalysis, Sentiment};
use super::calculator::SafetyScore;
use serde::Serialize;

/// What prompted a recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTrigger {
    LowSafetyScore,
    UserResistance,
    NegativeLanguage,
}

/// What the counselor should do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryKind {
    ShowEmpathy,
    OfferChoiceQuestions,
    ConversationPause,
    PrivacyReminder,
}

/// A single recovery step with the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryAction {
    pub trigger: RecoveryTrigger,
    pub action: RecoveryKind,
    pub message: String,
}

impl RecoveryAction {
    fn new(trigger: RecoveryTrigger, action: RecoveryKind, message: &str) -> Self {
        Self {
            trigger,
            action,
            message: message.to_string(),
        }
    }
}

/// Lists the recovery steps for a scored turn, in the order to apply them.
pub fn recovery_actions(score: &SafetyScore, analysis: &ResponseAnalysis) -> Vec<RecoveryAction> {
    let mut actions = Vec::new();

    if score.recovery_needed {
        actions.push(RecoveryAction::new(
            RecoveryTrigger::LowSafetyScore,
            RecoveryKind::ShowEmpathy,
            "Thank you so much for sharing this with me. Your feelings matter, and I'm taking them seriously.",
        ));
        actions.push(RecoveryAction::new(
            RecoveryTrigger::LowSafetyScore,
            RecoveryKind::OfferChoiceQuestions,
            "If it's easier, you can simply pick one of the options below.",
        ));
    }

    if analysis.expression == Expression::Resistant {
        actions.push(RecoveryAction::new(
            RecoveryTrigger::UserResistance,
            RecoveryKind::ConversationPause,
            "You sound tired. Would you like to take a short break? We can pick this up any time.",
        ));
    }

    if analysis.sentiment == Sentiment::Negative {
        actions.push(RecoveryAction::new(
            RecoveryTrigger::NegativeLanguage,
            RecoveryKind::PrivacyReminder,
            "Everything you share here stays private. Please feel safe to tell me as much or as little as you like.",
        ));
    }

    actions
}

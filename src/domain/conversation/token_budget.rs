//! Reply token budget.
//!
//! Deeper stages get more room to respond. The budget grows with the
//! context already in the conversation and is bounded on both sides.

use super::message::Message;
use super::stage::ConversationStage;
use crate::domain::thresholds::tokens;

impl ConversationStage {
    /// Reply token baseline for this stage.
    pub fn token_baseline(&self) -> u32 {
        match self {
            Self::Warmup => 400,
            Self::Exploration => 600,
            Self::DeepDive => 800,
            Self::Closing => 500,
        }
    }
}

/// Rough token estimate of the conversation so far.
pub fn estimate_context_tokens(messages: &[Message]) -> u32 {
    let chars: usize = messages.iter().map(|m| m.content().chars().count()).sum();
    let estimate = (chars as f64 / tokens::CHARS_PER_WORD * tokens::TOKENS_PER_WORD).round();
    estimate.min(u32::MAX as f64) as u32
}

/// Maximum reply tokens for the next turn at `stage`.
pub fn token_budget(stage: ConversationStage, messages: &[Message]) -> u32 {
    let context = f64::from(estimate_context_tokens(messages));
    let context_multiplier = (context / tokens::CONTEXT_UNIT).min(tokens::MAX_CONTEXT_MULTIPLIER);
    let early_factor = if messages.len() < tokens::EARLY_MESSAGE_COUNT {
        tokens::EARLY_FACTOR
    } else {
        1.0
    };

    let raw = f64::from(stage.token_baseline()) * context_multiplier * early_factor;
    let bounded = raw.clamp(f64::from(tokens::MIN_REPLY), f64::from(tokens::MAX_REPLY));
    bounded.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `count` user messages whose combined length estimates to `context` tokens.
    fn conversation(count: usize, context: u32) -> Vec<Message> {
        let total_chars = (f64::from(context) / tokens::TOKENS_PER_WORD * tokens::CHARS_PER_WORD) as usize;
        let per_message = (total_chars / count).max(1);
        (0..count)
            .map(|_| Message::user("a".repeat(per_message)).unwrap())
            .collect()
    }

    #[test]
    fn estimate_follows_character_count() {
        let messages = vec![Message::user("a".repeat(1000)).unwrap()];
        assert_eq!(estimate_context_tokens(&messages), 150);
        assert_eq!(estimate_context_tokens(&[]), 0);
    }

    #[test]
    fn empty_conversation_gets_the_floor() {
        for stage in ConversationStage::ALL {
            assert_eq!(token_budget(stage, &[]), tokens::MIN_REPLY);
        }
    }

    #[test]
    fn budget_table() {
        // (stage, messages, context tokens, expected)
        let cases = [
            (ConversationStage::Warmup, 6, 1000, 400),
            (ConversationStage::Exploration, 6, 1000, 600),
            (ConversationStage::DeepDive, 6, 1000, 800),
            (ConversationStage::Closing, 6, 1000, 500),
            (ConversationStage::Warmup, 2, 1000, 480),
            (ConversationStage::Exploration, 6, 1200, 720),
            (ConversationStage::Closing, 6, 3000, 750),
            (ConversationStage::DeepDive, 6, 3000, 1000),
            (ConversationStage::DeepDive, 2, 1500, 1000),
            (ConversationStage::Warmup, 6, 500, 300),
        ];
        for (stage, count, context, expected) in cases {
            let messages = conversation(count, context);
            assert_eq!(
                token_budget(stage, &messages),
                expected,
                "{stage} with {count} messages and {context} context tokens"
            );
        }
    }

    #[test]
    fn budget_stays_within_bounds_for_long_conversations() {
        let messages: Vec<Message> = (0..40)
            .map(|_| Message::user("a".repeat(4000)).unwrap())
            .collect();
        for stage in ConversationStage::ALL {
            let budget = token_budget(stage, &messages);
            assert!((tokens::MIN_REPLY..=tokens::MAX_REPLY).contains(&budget));
        }
    }
}

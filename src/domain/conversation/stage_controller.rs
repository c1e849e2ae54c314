//! Stage controller.
//!
//! Picks the active conversation stage from the number of questions asked
//! so far, then holds the conversation back while the safety score is
//! below what the target stage requires. Nothing is carried between turns:
//! the same inputs always give the same stage.

use super::message::Message;
use super::stage::ConversationStage;
use crate::domain::questions::{QuestionMode, UnitDraw};
use crate::domain::safety::SafetyScore;
use serde::Serialize;

/// Parameters that govern a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageConfig {
    pub stage: ConversationStage,
    /// Last question count that still belongs to this stage. `None` for closing.
    pub max_questions: Option<u32>,
    /// Fraction of turns that use a choice question, in (0, 1).
    pub choice_ratio: f64,
    /// Minimum overall safety score for this stage, in (0, 1).
    pub safety_threshold: f64,
}

/// Outcome of a stage evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageDecision {
    /// The stage the conversation should run at.
    pub config: StageConfig,
    /// The stage the question count alone would select.
    pub target: ConversationStage,
    /// True when the safety gate held the conversation below `target`.
    pub deferred: bool,
}

/// Selects stages from question count and safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageController {
    warmup_max_questions: u32,
    exploration_max_questions: u32,
    deep_dive_max_questions: u32,
}

impl Default for StageController {
    fn default() -> Self {
        Self {
            warmup_max_questions: 2,
            exploration_max_questions: 7,
            deep_dive_max_questions: 15,
        }
    }
}

impl StageController {
    /// Creates a controller with custom question ceilings.
    ///
    /// Ceilings are expected to be strictly increasing; the config layer
    /// validates them before they get here.
    pub fn new(warmup: u32, exploration: u32, deep_dive: u32) -> Self {
        Self {
            warmup_max_questions: warmup,
            exploration_max_questions: exploration,
            deep_dive_max_questions: deep_dive,
        }
    }

    /// Returns the full configuration of a stage.
    pub fn config_for(&self, stage: ConversationStage) -> StageConfig {
        let max_questions = match stage {
            ConversationStage::Warmup => Some(self.warmup_max_questions),
            ConversationStage::Exploration => Some(self.exploration_max_questions),
            ConversationStage::DeepDive => Some(self.deep_dive_max_questions),
            ConversationStage::Closing => None,
        };
        StageConfig {
            stage,
            max_questions,
            choice_ratio: stage.default_choice_ratio(),
            safety_threshold: stage.safety_threshold(),
        }
    }

    /// Returns the stage selected by question count alone.
    pub fn target_stage(&self, question_count: u32) -> ConversationStage {
        if question_count <= self.warmup_max_questions {
            ConversationStage::Warmup
        } else if question_count <= self.exploration_max_questions {
            ConversationStage::Exploration
        } else if question_count <= self.deep_dive_max_questions {
            ConversationStage::DeepDive
        } else {
            ConversationStage::Closing
        }
    }

    /// Returns the stage configuration to use for this turn.
    pub fn get_stage(&self, question_count: u32, safety: &SafetyScore) -> StageConfig {
        self.evaluate(question_count, safety).config
    }

    /// Evaluates the stage for this turn.
    pub fn evaluate(&self, question_count: u32, safety: &SafetyScore) -> StageDecision {
        self.evaluate_overall(question_count, safety.overall.value())
    }

    /// Evaluates the stage against a bare overall score.
    ///
    /// Steps back one stage at a time while `overall` is below the
    /// candidate's threshold. Warmup is the floor.
    pub fn evaluate_overall(&self, question_count: u32, overall: f64) -> StageDecision {
        let target = self.target_stage(question_count);
        let mut stage = target;

        while overall < stage.safety_threshold() {
            match stage.previous() {
                Some(previous) => stage = previous,
                None => break,
            }
        }

        let decision = StageDecision {
            config: self.config_for(stage),
            target,
            deferred: stage != target,
        };

        if decision.deferred {
            tracing::debug!(
                question_count,
                overall,
                target = %target,
                stage = %stage,
                "Safety gate held conversation at an earlier stage"
            );
        }

        decision
    }
}

/// Counts the questions asked so far (assistant turns).
pub fn question_count_of(messages: &[Message]) -> u32 {
    let count = messages.iter().filter(|m| m.is_assistant()).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Picks between a choice question and an open-ended prompt for this turn.
///
/// Recovery always gets a choice question.
pub fn select_mode(config: &StageConfig, safety: &SafetyScore, draw: &mut dyn UnitDraw) -> QuestionMode {
    if safety.recovery_needed {
        return QuestionMode::Closed;
    }
    if draw.next_unit() < config.choice_ratio {
        QuestionMode::Closed
    } else {
        QuestionMode::OpenEnded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questions::FixedDraw;

    fn controller() -> StageController {
        StageController::default()
    }

    mod stage_table {
        use super::*;

        #[test]
        fn default_table_matches_stage_parameters() {
            let c = controller();

            let warmup = c.config_for(ConversationStage::Warmup);
            assert_eq!(warmup.max_questions, Some(2));
            assert_eq!(warmup.choice_ratio, 0.8);
            assert_eq!(warmup.safety_threshold, 0.6);

            let exploration = c.config_for(ConversationStage::Exploration);
            assert_eq!(exploration.max_questions, Some(7));
            assert_eq!(exploration.choice_ratio, 0.6);
            assert_eq!(exploration.safety_threshold, 0.5);

            let deep_dive = c.config_for(ConversationStage::DeepDive);
            assert_eq!(deep_dive.max_questions, Some(15));
            assert_eq!(deep_dive.choice_ratio, 0.4);
            assert_eq!(deep_dive.safety_threshold, 0.4);

            let closing = c.config_for(ConversationStage::Closing);
            assert_eq!(closing.max_questions, None);
            assert_eq!(closing.choice_ratio, 0.7);
            assert_eq!(closing.safety_threshold, 0.6);
        }

        #[test]
        fn target_stage_follows_count_thresholds() {
            let c = controller();
            assert_eq!(c.target_stage(0), ConversationStage::Warmup);
            assert_eq!(c.target_stage(2), ConversationStage::Warmup);
            assert_eq!(c.target_stage(3), ConversationStage::Exploration);
            assert_eq!(c.target_stage(7), ConversationStage::Exploration);
            assert_eq!(c.target_stage(8), ConversationStage::DeepDive);
            assert_eq!(c.target_stage(15), ConversationStage::DeepDive);
            assert_eq!(c.target_stage(16), ConversationStage::Closing);
            assert_eq!(c.target_stage(u32::MAX), ConversationStage::Closing);
        }

        #[test]
        fn custom_ceilings_shift_boundaries() {
            let c = StageController::new(1, 3, 5);
            assert_eq!(c.target_stage(2), ConversationStage::Exploration);
            assert_eq!(c.target_stage(6), ConversationStage::Closing);
        }
    }

    mod safety_gate {
        use super::*;

        #[test]
        fn safe_conversation_runs_at_target_stage() {
            let decision = controller().evaluate_overall(10, 0.9);
            assert_eq!(decision.config.stage, ConversationStage::DeepDive);
            assert!(!decision.deferred);
        }

        #[test]
        fn exploration_below_threshold_falls_back_to_warmup() {
            let decision = controller().evaluate_overall(5, 0.45);
            assert_eq!(decision.target, ConversationStage::Exploration);
            assert_eq!(decision.config.stage, ConversationStage::Warmup);
            assert!(decision.deferred);
        }

        #[test]
        fn closing_steps_back_until_gate_passes() {
            // 0.55 fails closing (0.6), passes deep_dive (0.4).
            let decision = controller().evaluate_overall(20, 0.55);
            assert_eq!(decision.target, ConversationStage::Closing);
            assert_eq!(decision.config.stage, ConversationStage::DeepDive);
        }

        #[test]
        fn deep_dive_gate_walks_back_one_stage_at_a_time() {
            // 0.35 fails deep_dive (0.4), exploration (0.5), and warmup (0.6).
            let decision = controller().evaluate_overall(12, 0.35);
            assert_eq!(decision.config.stage, ConversationStage::Warmup);
        }

        #[test]
        fn warmup_is_the_floor() {
            let decision = controller().evaluate_overall(0, 0.0);
            assert_eq!(decision.config.stage, ConversationStage::Warmup);
            assert!(!decision.deferred);
        }

        #[test]
        fn threshold_is_inclusive() {
            let decision = controller().evaluate_overall(5, 0.5);
            assert_eq!(decision.config.stage, ConversationStage::Exploration);
        }

        #[test]
        fn get_stage_uses_overall_from_safety_score() {
            let neutral = SafetyScore::neutral();
            // Neutral 0.5 passes exploration but not closing.
            assert_eq!(
                controller().get_stage(4, &neutral).stage,
                ConversationStage::Exploration
            );
            assert_eq!(
                controller().get_stage(30, &neutral).stage,
                ConversationStage::DeepDive
            );
        }

        #[test]
        fn stage_is_recomputed_each_turn() {
            let c = controller();
            let turns = [
                (12, 0.45, ConversationStage::DeepDive),
                (13, 0.35, ConversationStage::Warmup),
                (14, 0.5, ConversationStage::Exploration),
                (16, 0.65, ConversationStage::Closing),
                (17, 0.55, ConversationStage::DeepDive),
            ];
            for (count, overall, expected) in turns {
                assert_eq!(c.evaluate_overall(count, overall).config.stage, expected, "count {count}");
            }
        }

        #[test]
        fn evaluation_is_deterministic() {
            let c = controller();
            assert_eq!(c.evaluate_overall(9, 0.42), c.evaluate_overall(9, 0.42));
        }
    }

    mod counting {
        use super::*;

        #[test]
        fn question_count_counts_assistant_turns() {
            let messages = vec![
                Message::assistant("How are you feeling today?").unwrap(),
                Message::user("Tired").unwrap(),
                Message::assistant("What has been tiring?").unwrap(),
                Message::user("Work").unwrap(),
            ];
            assert_eq!(question_count_of(&messages), 2);
            assert_eq!(question_count_of(&[]), 0);
        }
    }

    mod mode_selection {
        use super::*;

        #[test]
        fn draw_below_choice_ratio_selects_closed() {
            let config = controller().config_for(ConversationStage::Warmup);
            let mut draw = FixedDraw::new(vec![0.79]);
            assert_eq!(
                select_mode(&config, &SafetyScore::neutral(), &mut draw),
                QuestionMode::Closed
            );
        }

        #[test]
        fn draw_at_or_above_choice_ratio_selects_open_ended() {
            let config = controller().config_for(ConversationStage::DeepDive);
            let mut draw = FixedDraw::new(vec![0.4]);
            assert_eq!(
                select_mode(&config, &SafetyScore::neutral(), &mut draw),
                QuestionMode::OpenEnded
            );
        }

        #[test]
        fn recovery_forces_closed() {
            let config = controller().config_for(ConversationStage::DeepDive);
            let mut score = SafetyScore::neutral();
            score.recovery_needed = true;
            let mut draw = FixedDraw::new(vec![0.99]);
            assert_eq!(select_mode(&config, &score, &mut draw), QuestionMode::Closed);
        }
    }
}

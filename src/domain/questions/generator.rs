//! Choice question generator.
//!
//! Picks a question type from the stage's cumulative thresholds, picks a
//! template that does not repeat a recent topic, and instantiates it.
//! Always returns a usable question.

use super::choice_question::{ChoiceQuestion, ChoiceQuestionParts, QuestionMode, QuestionType};
use super::draw::UnitDraw;
use super::templates::{self, QuestionTemplate, FREE_ANSWER_OPTION, SINGLE_FEELING};
use crate::domain::conversation::{question_count_of, select_mode, ConversationStage, Message, StageConfig};
use crate::domain::diagnosis::DiagnosisProfile;
use crate::domain::safety::SafetyScore;
use crate::domain::thresholds::questions::{MAX_OPTIONS, RECENT_TOPIC_WINDOW};

const OPEN_ENDED_FOLLOW_UP: &str = "Feel free to answer in your own words.";

/// Maps a unit draw to a question type for a stage.
pub fn select_question_type(stage: ConversationStage, draw: f64) -> QuestionType {
    use QuestionType::*;

    match stage {
        ConversationStage::Warmup => {
            if draw < 0.6 {
                Single
            } else if draw < 0.8 {
                EmotionScale
            } else {
                Scale
            }
        }
        ConversationStage::Exploration => {
            if draw < 0.4 {
                Single
            } else if draw < 0.6 {
                Multiple
            } else if draw < 0.8 {
                Scale
            } else {
                EmotionScale
            }
        }
        ConversationStage::DeepDive => {
            if draw < 0.3 {
                Scale
            } else if draw < 0.5 {
                Multiple
            } else if draw < 0.7 {
                EmotionScale
            } else {
                Single
            }
        }
        ConversationStage::Closing => {
            if draw < 0.5 {
                Scale
            } else if draw < 0.8 {
                Single
            } else {
                EmotionScale
            }
        }
    }
}

/// Generates choice questions tailored to a diagnosis profile.
#[derive(Debug, Clone, Default)]
pub struct ChoiceQuestionGenerator {
    profile: DiagnosisProfile,
}

impl ChoiceQuestionGenerator {
    pub fn new(profile: DiagnosisProfile) -> Self {
        Self { profile }
    }

    /// Generates the next question for a stage.
    ///
    /// The first draw picks the mode against `config.choice_ratio`, so a
    /// share of `1 - choice_ratio` turns comes back open-ended. Recovery
    /// always gets a closed question.
    pub fn generate(
        &self,
        config: &StageConfig,
        messages: &[Message],
        previous_topics: &[String],
        safety: &SafetyScore,
        draw: &mut dyn UnitDraw,
    ) -> ChoiceQuestion {
        let mode = select_mode(config, safety, draw);
        self.generate_with_mode(config, messages, previous_topics, mode, draw)
    }

    /// Generates a question in the given mode.
    ///
    /// Draws twice: once for the question type, once for the template.
    pub fn generate_with_mode(
        &self,
        config: &StageConfig,
        messages: &[Message],
        previous_topics: &[String],
        mode: QuestionMode,
        draw: &mut dyn UnitDraw,
    ) -> ChoiceQuestion {
        let stage = config.stage;
        let question_type = select_question_type(stage, draw.next_unit());

        let full = templates::pool(question_type, stage, &self.profile);
        let fresh: Vec<&'static QuestionTemplate> = full
            .iter()
            .copied()
            .filter(|t| !is_recent(t.topic, previous_topics))
            .collect();
        let pool = if fresh.is_empty() { full } else { fresh };

        let pick = draw.next_unit();
        let template = match pool.len() {
            0 => &SINGLE_FEELING,
            n => pool[((pick * n as f64) as usize).min(n - 1)],
        };

        let turn = question_count_of(messages) as usize;
        match ChoiceQuestion::new(parts_for(template, stage, mode, turn)) {
            Ok(question) => {
                tracing::debug!(
                    question_id = question.id(),
                    stage = %stage,
                    mode = ?mode,
                    "Generated choice question"
                );
                question
            }
            Err(err) => {
                tracing::warn!(error = %err, template = template.key, "Falling back to generic question");
                fallback(stage, mode, turn)
            }
        }
    }
}

fn is_recent(topic: &str, previous_topics: &[String]) -> bool {
    previous_topics
        .iter()
        .rev()
        .take(RECENT_TOPIC_WINDOW)
        .any(|t| t.trim().eq_ignore_ascii_case(topic))
}

fn parts_for(
    template: &QuestionTemplate,
    stage: ConversationStage,
    mode: QuestionMode,
    turn: usize,
) -> ChoiceQuestionParts {
    let mut options: Vec<_> = template.options.iter().map(|o| o.to_option()).collect();
    let mut follow_up = template.follow_up.map(str::to_string);

    if mode == QuestionMode::OpenEnded {
        if options.len() < MAX_OPTIONS {
            options.push(FREE_ANSWER_OPTION.to_option());
        }
        follow_up.get_or_insert_with(|| OPEN_ENDED_FOLLOW_UP.to_string());
    }

    let empathy_prefix = match template.empathy_prefix {
        Some(prefix) => prefix.to_string(),
        None => {
            let prefixes = templates::stage_prefixes(stage);
            prefixes[turn % prefixes.len()].to_string()
        }
    };

    ChoiceQuestionParts {
        id: format!("{}_{}_{}", template.question_type.as_str(), stage.as_str(), template.key),
        question_type: template.question_type,
        question: template.question.to_string(),
        empathy_prefix,
        options,
        safety_message: template.safety_message.to_string(),
        follow_up,
        stage,
        topic: template.topic.to_string(),
        mode,
    }
}

/// The generic single-choice question. Its static options satisfy the
/// option-count invariant, so it skips validation.
fn fallback(stage: ConversationStage, mode: QuestionMode, turn: usize) -> ChoiceQuestion {
    ChoiceQuestion::assemble(parts_for(&SINGLE_FEELING, stage, mode, turn))
}

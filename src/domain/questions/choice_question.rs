//! Choice question value objects.

use crate::domain::conversation::ConversationStage;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::thresholds::questions::{MAX_OPTIONS, MIN_OPTIONS};
use serde::Serialize;

/// Shape of a choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Pick exactly one option.
    Single,
    /// Pick any number of options.
    Multiple,
    /// Rate on a 1 to 5 scale.
    Scale,
    /// Pick the closest emotion.
    EmotionScale,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Scale => "scale",
            Self::EmotionScale => "emotion_scale",
        }
    }
}

/// Whether the turn asks for a choice or invites free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionMode {
    Closed,
    /// Options are shown as hints; a free-text answer is expected.
    OpenEnded,
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            emoji: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// A question offered to the user as a set of choices.
///
/// # Invariants
///
/// - `options` holds between 2 and 10 entries, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceQuestion {
    id: String,
    #[serde(rename = "type")]
    question_type: QuestionType,
    question: String,
    empathy_prefix: String,
    options: Vec<ChoiceOption>,
    safety_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    follow_up: Option<String>,
    stage: ConversationStage,
    topic: String,
    mode: QuestionMode,
}

/// Fields of a choice question before validation.
#[derive(Debug, Clone)]
pub struct ChoiceQuestionParts {
    pub id: String,
    pub question_type: QuestionType,
    pub question: String,
    pub empathy_prefix: String,
    pub options: Vec<ChoiceOption>,
    pub safety_message: String,
    pub follow_up: Option<String>,
    pub stage: ConversationStage,
    pub topic: String,
    pub mode: QuestionMode,
}

impl ChoiceQuestion {
    /// Builds a question, checking the option count.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if there are fewer than 2 or more than 10 options
    pub fn new(parts: ChoiceQuestionParts) -> Result<Self, DomainError> {
        let count = parts.options.len();
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
            return Err(DomainError::new(
                ErrorCode::OutOfRange,
                format!(
                    "A choice question needs {} to {} options, got {}",
                    MIN_OPTIONS, MAX_OPTIONS, count
                ),
            )
            .with_detail("question_id", parts.id));
        }

        Ok(Self::assemble(parts))
    }

    /// Builds a question from parts known to satisfy the invariants.
    pub(super) fn assemble(parts: ChoiceQuestionParts) -> Self {
        Self {
            id: parts.id,
            question_type: parts.question_type,
            question: parts.question,
            empathy_prefix: parts.empathy_prefix,
            options: parts.options,
            safety_message: parts.safety_message,
            follow_up: parts.follow_up,
            stage: parts.stage,
            topic: parts.topic,
            mode: parts.mode,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn empathy_prefix(&self) -> &str {
        &self.empathy_prefix
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn safety_message(&self) -> &str {
        &self.safety_message
    }

    pub fn follow_up(&self) -> Option<&str> {
        self.follow_up.as_deref()
    }

    pub fn stage(&self) -> ConversationStage {
        self.stage
    }

    /// Topic tag used to avoid repeating a subject on consecutive turns.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn mode(&self) -> QuestionMode {
        self.mode
    }

    /// Renders the question as plain text for the prompt.
    pub fn render(&self) -> String {
        let mut out = format!("{} {}\n", self.empathy_prefix, self.question);
        for (i, option) in self.options.iter().enumerate() {
            out.push_str(&format!("{}. {}", i + 1, option.label));
            if let Some(description) = &option.description {
                out.push_str(&format!(" ({})", description));
            }
            out.push('\n');
        }
        out.push_str(&self.safety_message);
        out
    }
}

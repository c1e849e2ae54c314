//! Personalization derived from the diagnosis profile.
//!
//! Turns the profile into the short texts the prompt needs: the concern
//! the user most likely came with, and how to judge whether it has been
//! resolved for this kind of person.

use super::profile::{ConstitutionType, DiagnosisProfile, PersonalityType};
use serde::Serialize;

/// Used when the profile says nothing about likely concerns.
pub const DEFAULT_CONCERN: &str = "self-understanding and life direction";

/// Used when the profile gives no basis for a tailored judgment.
pub const DEFAULT_JUDGMENT_BIAS: &str = "- Confirm the user's own sense of resolution";

/// Preferred way of thinking through a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingStyle {
    Analytical,
    Intuitive,
    Empathetic,
    Structured,
}

impl ThinkingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analytical => "analytical",
            Self::Intuitive => "intuitive",
            Self::Empathetic => "empathetic",
            Self::Structured => "structured",
        }
    }
}

/// Derives the concern the user most likely brings to the conversation.
///
/// Concerns from the personality type come first, then the one from the
/// primary constitution type. Returns [`DEFAULT_CONCERN`] when neither
/// contributes.
pub fn extract_concern(profile: &DiagnosisProfile) -> String {
    let mut concerns: Vec<&str> = Vec::new();

    if let Some(pt) = &profile.personality_type {
        if pt.is_introverted() {
            concerns.push("how to relate to others and balance personal energy");
        }
        if pt.is_feeling() {
            concerns.push("managing emotions and emotional connection with others");
        }
        if pt.is_thinking() {
            concerns.push("balancing logical thinking with feelings");
        }
    }

    if let Some(primary) = profile.constitution_primary {
        concerns.push(match primary.value() {
            1 | 2 => "a tendency to overthink",
            3 | 4 => "high sensitivity and boundaries with others",
            5 | 6 => "perfectionism and harsh self-evaluation",
            7 | 8 => "balancing drive with planning",
            _ => "a preference for stability and adapting to change",
        });
    }

    if concerns.is_empty() {
        DEFAULT_CONCERN.to_string()
    } else {
        concerns.join(", ")
    }
}

/// Builds the bullet list that tells the judge what "resolved" means for
/// this user.
pub fn judgment_bias(profile: &DiagnosisProfile) -> String {
    let mut lines: Vec<&str> = Vec::new();

    if let Some(pt) = &profile.personality_type {
        if pt.is_thinking() {
            lines.push(
                "- **Thinking type (T)**: check that a logical solution is clear → \"Is your concrete plan of action clear now?\"",
            );
        } else if pt.is_feeling() {
            lines.push(
                "- **Feeling type (F)**: check for emotional acceptance → \"Do you feel a little lighter now?\"",
            );
        }
    }

    match profile.constitution_primary.map(|c| c.value()) {
        Some(5 | 6) => lines.push(
            "- **Constitution types 5-6**: perfectionist tendency → \"Have all of your questions been answered?\"",
        ),
        Some(3 | 4) => lines.push(
            "- **Constitution types 3-4**: highly sensitive → \"Is anything still weighing on your mind?\"",
        ),
        _ => {}
    }

    if lines.is_empty() {
        DEFAULT_JUDGMENT_BIAS.to_string()
    } else {
        lines.join("\n")
    }
}

/// Maps a personality type to its thinking style. No type means intuitive.
pub fn thinking_style(personality: Option<&PersonalityType>) -> ThinkingStyle {
    match personality {
        Some(pt) if pt.is_intuitive() && pt.is_thinking() => ThinkingStyle::Analytical,
        Some(pt) if pt.is_feeling() => ThinkingStyle::Empathetic,
        Some(pt) if pt.is_sensing() && pt.is_thinking() => ThinkingStyle::Structured,
        _ => ThinkingStyle::Intuitive,
    }
}

/// Lists communication preferences, one per letter of the type.
pub fn communication_style(personality: &PersonalityType) -> Vec<&'static str> {
    let mut styles = Vec::with_capacity(3);
    if personality.is_extraverted() {
        styles.push("prefers talking things through with others");
    }
    if personality.is_introverted() {
        styles.push("needs time for inner reflection");
    }
    if personality.is_intuitive() {
        styles.push("enjoys discussing possibilities and ideas");
    }
    if personality.is_sensing() {
        styles.push("prefers concrete, practical topics");
    }
    if personality.is_thinking() {
        styles.push("values logical analysis");
    }
    if personality.is_feeling() {
        styles.push("values feelings and personal values");
    }
    styles
}

/// Suggested counseling approach for a constitution type.
pub fn constitution_approach(constitution: ConstitutionType) -> [&'static str; 2] {
    match constitution.value() {
        1 => ["make goals explicit", "appeal to a sense of responsibility"],
        2 => ["offer balanced options", "value harmony"],
        3 => ["lead with emotional empathy", "respect intuition"],
        4 => ["favor logical explanations", "take an analytical approach"],
        5 => ["offer change and stimulation", "stay flexible"],
        6 => ["value stability and continuity", "progress step by step"],
        7 => ["respect creativity and self-expression", "acknowledge individuality"],
        8 => ["focus on practicality and efficiency", "aim for concrete results"],
        9 => ["honor depth and inner life", "support inner exploration"],
        _ => ["value social connection", "seek harmony within the group"],
    }
}

/// Everything the prompt needs to personalize a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalizationContext {
    pub initial_concern: String,
    pub judgment_bias: String,
    pub thinking_style: Option<ThinkingStyle>,
    pub communication_style: Vec<&'static str>,
    pub constitution_approach: Vec<&'static str>,
}

impl PersonalizationContext {
    /// Derives the personalization for a profile. Computed once per session.
    pub fn from_profile(profile: &DiagnosisProfile) -> Self {
        let personality = profile.personality_type.as_ref();
        Self {
            initial_concern: extract_concern(profile),
            judgment_bias: judgment_bias(profile),
            thinking_style: personality.map(|pt| thinking_style(Some(pt))),
            communication_style: personality.map(communication_style).unwrap_or_default(),
            constitution_approach: profile
                .constitution_primary
                .map(|c| constitution_approach(c).to_vec())
                .unwrap_or_default(),
        }
    }
}

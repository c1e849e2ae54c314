//! System prompt assembly for a counseling turn.
//!
//! The prompt carries the person-centred principles, where the conversation
//! stands, what the diagnosis says about the user, and the instructions for
//! emitting the end-of-conversation judgment.

use std::fmt;

use crate::domain::conversation::StageConfig;
use crate::domain::diagnosis::{DiagnosisProfile, PersonalizationContext};
use crate::domain::questions::{ChoiceQuestion, QuestionMode};
use crate::domain::safety::SafetyScore;
use crate::domain::thresholds::completion::CONFIDENCE_FLOOR;

const NOT_DIAGNOSED: &str = "not diagnosed";

/// Phrasing the counselor must not use.
pub const AVOIDED_WORDS: [&str; 6] = ["right", "wrong", "good", "bad", "should", "must"];

/// Phrasing the counselor is encouraged to use.
pub const PREFERRED_WORDS: [&str; 6] = ["feel", "think", "consider", "important", "understand", "accept"];

/// Everything one turn's prompt depends on.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub stage: &'a StageConfig,
    pub mode: QuestionMode,
    pub safety: &'a SafetyScore,
    pub profile: &'a DiagnosisProfile,
    pub personalization: &'a PersonalizationContext,
    pub next_question: Option<&'a ChoiceQuestion>,
}

/// An assembled system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounselingPrompt(String);

impl CounselingPrompt {
    pub fn build(inputs: &PromptInputs<'_>) -> Self {
        let mut out = String::with_capacity(4096);

        out.push_str(INTRODUCTION);
        out.push_str(PRINCIPLES);
        out.push_str(&strategy_section(inputs));
        out.push_str(RESPONSE_STYLE);
        out.push_str(&diagnosis_section(inputs.profile, inputs.personalization));

        if let Some(question) = inputs.next_question {
            out.push_str("\n## Next question\n");
            out.push_str("Weave this question into your reply after acknowledging the user:\n");
            out.push_str(&question.render());
            out.push('\n');
        }

        if inputs.safety.recovery_needed {
            out.push_str(&recovery_section(inputs.safety));
        }

        out.push_str(&language_section());
        out.push_str(&completion_section(inputs.profile, inputs.personalization));

        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CounselingPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Sections
// ============================================================================

const INTRODUCTION: &str = "You are an AI counselor who puts psychological safety first and draws on the user's integrated diagnosis.\n";

const PRINCIPLES: &str = r#"
## Core principles (Carl Rogers' three conditions)
1. Congruence: be honest as an AI and openly express your wish to understand.
2. Unconditional positive regard: accept every feeling and choice without judging it.
3. Empathic understanding: summarize and check feelings; correct yourself at once when you misunderstand.
"#;

const RESPONSE_STYLE: &str = r#"
## Response style
1. Express warm empathy naturally and receive the user's feelings and experiences.
2. Briefly summarize the user's words and stay close to the feeling behind them ("It sounds like you feel ...").
3. Check your understanding when needed, in natural language ("Please tell me if I have that wrong").
4. Offer three or four answer choices so the user can respond easily.
5. Express thanks and encouragement in a way that fits the stage of the conversation.
"#;

fn strategy_section(inputs: &PromptInputs<'_>) -> String {
    let stage = inputs.stage.stage;
    let mode = match inputs.mode {
        QuestionMode::Closed => "choice (offer the options)",
        QuestionMode::OpenEnded => "open (invite the user's own words; options are hints)",
    };
    format!(
        "\n## Question strategy\nCurrent stage: {} (warmup/exploration/deep_dive/closing)\nStage goal: {}\nQuestion mode: {}\nPsychological safety score: {:.2} ({})\n",
        stage,
        stage.directive(),
        mode,
        inputs.safety.overall.value(),
        inputs.safety.level.label(),
    )
}

fn diagnosis_section(profile: &DiagnosisProfile, personalization: &PersonalizationContext) -> String {
    let mut lines = Vec::new();

    if let Some(personality) = &profile.personality_type {
        let mut line = format!("- Personality type: {}", personality.as_str());
        if let Some(style) = personalization.thinking_style {
            line.push_str(&format!(" ({} thinker)", style.as_str()));
        }
        lines.push(line);
        if !personalization.communication_style.is_empty() {
            lines.push(format!(
                "  Communication: {}",
                personalization.communication_style.join("; ")
            ));
        }
    }

    if let Some(primary) = profile.constitution_primary {
        let mut line = format!("- Constitution: type {}", primary);
        if let Some(secondary) = profile.constitution_secondary {
            line.push_str(&format!(" (secondary {})", secondary));
        }
        if !profile.constitution_characteristics.is_empty() {
            line.push_str(&format!(" - {}", profile.constitution_characteristics.join(", ")));
        }
        lines.push(line);
        if !personalization.constitution_approach.is_empty() {
            lines.push(format!(
                "  Approach: {}",
                personalization.constitution_approach.join("; ")
            ));
        }
    }

    if let Some(fortune) = &profile.fortune {
        let period = fortune.current_period.as_deref().unwrap_or(NOT_DIAGNOSED);
        let mut line = format!("- Fortune: {}", period);
        if !fortune.characteristics.is_empty() {
            line.push_str(&format!(" - {}", fortune.characteristics.join(", ")));
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push("- No diagnosis data; rely on what the user shares.".to_string());
    }

    format!("\n## Using the diagnosis\n{}\n", lines.join("\n"))
}

fn recovery_section(safety: &SafetyScore) -> String {
    let mut out = String::from(
        r#"
## Urgent: psychological safety recovery mode
- Put a warm, empathic message first
- Use choice questions only
- Remind the user that their privacy is protected
- Offer the option to pause the conversation
"#,
    );
    for recommendation in &safety.recommendations {
        out.push_str(&format!("- {}\n", recommendation));
    }
    out
}

fn language_section() -> String {
    format!(
        "\n## Language to avoid\nAvoid: {}\nPrefer: {}\n",
        AVOIDED_WORDS.join(", "),
        PREFERRED_WORDS.join(", ")
    )
}

fn profile_summary(profile: &DiagnosisProfile) -> String {
    let personality = profile
        .personality_type
        .as_ref()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| NOT_DIAGNOSED.to_string());
    let constitution = profile
        .constitution_primary
        .map(|c| format!("type {}", c))
        .unwrap_or_else(|| NOT_DIAGNOSED.to_string());
    let fortune = profile.fortune.as_ref();
    let animal = fortune.and_then(|f| f.animal.as_deref()).unwrap_or(NOT_DIAGNOSED);
    let six_star = fortune.and_then(|f| f.six_star.as_deref()).unwrap_or(NOT_DIAGNOSED);

    format!(
        "- Personality type: {}\n- Constitution: {}\n- Fortune: {} / {}\n",
        personality, constitution, animal, six_star
    )
}

fn completion_section(profile: &DiagnosisProfile, personalization: &PersonalizationContext) -> String {
    let mut out = String::from(COMPLETION_TASK);
    out.push_str(&format!(
        "\n### Conservative judgment\n- Avoid false positives: when in doubt, set resolved to false.\n- If confidence is below {:.1}, resolved MUST be false.\n- Read carefully for new questions the user only hints at.\n",
        CONFIDENCE_FLOOR
    ));
    out.push_str("\n### Session context\n");
    out.push_str(&format!("- Initial concern: {}\n", personalization.initial_concern));
    out.push_str(&profile_summary(profile));
    out.push_str("\n### Personalized judgment\n");
    out.push_str(&personalization.judgment_bias);
    out.push('\n');
    out.push_str(FEW_SHOT_EXAMPLES);
    out
}

const COMPLETION_TASK: &str = r#"
## Conversation completion judgment
You have two roles:
1. Advisor: respond warmly and empathically to the user's concern.
2. Judge: at the end of your reply, decide whether the user's concern has been resolved.

### Criteria (evaluate all)
a) Explicit resolution signal: the user expresses thanks or closure ("thank you", "that helped", "that settles it").
b) No open questions: the message contains no new question or doubt.
c) Practical resolution: the suggested next steps are feasible and the user accepts them.
d) Positive close: the user's tone is positive or satisfied.

### Output format
At the very end of your reply, output exactly this JSON block:

```json
{
  "resolved": <true|false>,
  "confidence": <0.0-1.0>,
  "next_action": "<string>",
  "_reasoning": "<free text>"
}
```

- resolved: true only when the concern is resolved and confidence is at least the threshold below.
- confidence: how sure you are, from 0.0 to 1.0.
- next_action: a friendly closing message when resolved, otherwise a concrete follow-up question.
- _reasoning: why you decided this. Internal only; never shown to the user.
"#;

const FEW_SHOT_EXAMPLES: &str = r#"
### Examples

#### Example 1: resolved (confidence 0.9)
User: "I see, looking at it that way really helps. Thank you so much!"
```json
{
  "resolved": true,
  "confidence": 0.9,
  "next_action": "I'm glad this helped! Come back any time you'd like to talk.",
  "_reasoning": "Clear thanks (a), no new question (b), positive close (d). 0.9 >= 0.8, so resolved is true."
}
```

#### Example 2: not resolved (confidence 0.4)
User: "Thank you. By the way, would this work at my job too?"
```json
{
  "resolved": false,
  "confidence": 0.4,
  "next_action": "Yes, it can work at work too. What kind of situation do you have in mind?",
  "_reasoning": "Thanks are present but a new question follows, so criterion (b) fails. 0.4 < 0.8."
}
```

#### Example 3: borderline (confidence 0.7, not resolved)
User: "Okay. I'll think about it a bit."
```json
{
  "resolved": false,
  "confidence": 0.7,
  "next_action": "Take your time. If any questions come up, I'm here.",
  "_reasoning": "Ambiguous reply without a clear resolution signal. 0.7 < 0.8, so the conservative rule keeps resolved false."
}
```
"#;

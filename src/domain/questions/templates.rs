//! Question template catalog.
//!
//! Templates are static data. The generator picks a pool by question type,
//! stage, and profile, then instantiates one template into a
//! [`ChoiceQuestion`](super::ChoiceQuestion).

use super::choice_question::{ChoiceOption, QuestionType};
use crate::domain::conversation::ConversationStage;
use crate::domain::diagnosis::DiagnosisProfile;

/// Static description of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}

impl OptionSpec {
    pub fn to_option(self) -> ChoiceOption {
        ChoiceOption::new(self.id, self.label)
            .with_description(self.description)
            .with_emoji(self.emoji)
    }
}

/// Static description of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTemplate {
    pub key: &'static str,
    pub question_type: QuestionType,
    pub topic: &'static str,
    pub question: &'static str,
    /// Template-specific empathy prefix. `None` uses the stage prefix.
    pub empathy_prefix: Option<&'static str>,
    pub options: &'static [OptionSpec],
    pub safety_message: &'static str,
    pub follow_up: Option<&'static str>,
}

const fn opt(
    id: &'static str,
    label: &'static str,
    description: &'static str,
    emoji: &'static str,
) -> OptionSpec {
    OptionSpec {
        id,
        label,
        description,
        emoji,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Option sets
// ─────────────────────────────────────────────────────────────────────────────

const EMOTION_OPTIONS: &[OptionSpec] = &[
    opt("emotion_1", "Relief (1)", "calm and settled", "😌"),
    opt("emotion_2", "Anxiety (2)", "worried", "😰"),
    opt("emotion_3", "Sadness (3)", "feeling low", "😢"),
    opt("emotion_4", "Anger (4)", "irritated", "😠"),
    opt("emotion_5", "Joy (5)", "happy", "😊"),
    opt("emotion_6", "Confusion (6)", "not quite sure", "😵‍💫"),
];

const SCALE_OPTIONS: &[OptionSpec] = &[
    opt("1", "Strongly disagree", "not at all true for me", "1️⃣"),
    opt("2", "Disagree", "not very true for me", "2️⃣"),
    opt("3", "Neither", "somewhere in between", "3️⃣"),
    opt("4", "Agree", "somewhat true for me", "4️⃣"),
    opt("5", "Strongly agree", "very true for me", "5️⃣"),
];

const SITUATION_OPTIONS: &[OptionSpec] = &[
    opt("situation_work", "At work or school", "while I'm busy with tasks", "💼"),
    opt("situation_home", "At home", "in my private time", "🏠"),
    opt("situation_social", "Around other people", "in social situations", "👥"),
    opt("situation_alone", "When I'm alone", "in time by myself", "🧘"),
];

const SUPPORT_OPTIONS: &[OptionSpec] = &[
    opt("support_listen", "Someone to listen", "to feel understood", "👂"),
    opt("support_advice", "Advice", "concrete suggestions", "💡"),
    opt("support_time", "Time to think", "to reflect at my own pace", "⏰"),
    opt("support_action", "A push to act", "encouragement to take a step", "🚀"),
];

const THINKING_OPTIONS: &[OptionSpec] = &[
    opt("thinking_logical", "Logical analysis", "thinking it through step by step", "🧠"),
    opt("thinking_intuitive", "Intuition", "going with my gut", "✨"),
    opt("thinking_emotional", "Emotional understanding", "focusing on feelings", "❤️"),
    opt("thinking_practical", "Practical thinking", "thinking about what is realistic", "🔧"),
];

const FEELING_OPTIONS: &[OptionSpec] = &[
    opt("feeling_troubled", "Very troubled", "it's weighing on me heavily", "😰"),
    opt("feeling_concerned", "A little worried", "something is on my mind", "😔"),
    opt("feeling_confused", "Unsure", "I don't know what to do", "🤔"),
    opt("feeling_other", "Something else", "none of these fit", "💭"),
];

const PERSPECTIVE_OPTIONS: &[OptionSpec] = &[
    opt("perspective_challenge", "A challenge to overcome", "a chance to grow", "⛰️"),
    opt("perspective_burden", "A heavy burden", "a painful situation", "⚖️"),
    opt("perspective_temporary", "Something temporary", "it will pass eventually", "🌅"),
    opt("perspective_unclear", "I'm not sure", "it feels confusing", "❓"),
];

/// Appended to open-ended questions.
pub const FREE_ANSWER_OPTION: OptionSpec = opt(
    "free_answer",
    "I'd rather put it in my own words",
    "answer freely",
    "💬",
);

// ─────────────────────────────────────────────────────────────────────────────
// Templates
// ─────────────────────────────────────────────────────────────────────────────

const SCALE_SAFETY: &str = "There are no right answers. Choose whatever feels closest.";
const MULTIPLE_SAFETY: &str = "Choose as many as you like, or just the one that fits best.";

pub const EMOTION_NOW: QuestionTemplate = QuestionTemplate {
    key: "emotion_now",
    question_type: QuestionType::EmotionScale,
    topic: "feelings",
    question: "Which of these is closest to how you feel right now?",
    empathy_prefix: None,
    options: EMOTION_OPTIONS,
    safety_message: "Every emotion is natural. Choose the one you actually feel.",
    follow_up: None,
};

const SCALE_WORRY: QuestionTemplate = QuestionTemplate {
    key: "worry",
    question_type: QuestionType::Scale,
    topic: "worry",
    question: "\"This situation is weighing on me a lot.\" How much do you agree?",
    empathy_prefix: Some("Everyone feels this differently."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_SATISFACTION: QuestionTemplate = QuestionTemplate {
    key: "satisfaction",
    question_type: QuestionType::Scale,
    topic: "life",
    question: "\"I'm satisfied with my life right now.\" How much do you agree?",
    empathy_prefix: Some("Please answer however feels honest."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_STRESS: QuestionTemplate = QuestionTemplate {
    key: "stress",
    question_type: QuestionType::Scale,
    topic: "stress",
    question: "\"I'm under a lot of stress at the moment.\" How much do you agree?",
    empathy_prefix: Some("Everyone experiences stress."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_LOGIC: QuestionTemplate = QuestionTemplate {
    key: "logic",
    question_type: QuestionType::Scale,
    topic: "thinking",
    question: "\"I can look at my situation logically.\" How much do you agree?",
    empathy_prefix: Some("Everyone analyzes things in their own way."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_CONSIDERATION: QuestionTemplate = QuestionTemplate {
    key: "consideration",
    question_type: QuestionType::Scale,
    topic: "relationships",
    question: "\"I'm able to take other people's feelings into account.\" How much do you agree?",
    empathy_prefix: Some("Consideration for others takes many forms."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_SOCIAL_ENERGY: QuestionTemplate = QuestionTemplate {
    key: "social_energy",
    question_type: QuestionType::Scale,
    topic: "energy",
    question: "\"Talking with people gives me energy.\" How much do you agree?",
    empathy_prefix: Some("Energy comes from different places for everyone."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_REFLECTION: QuestionTemplate = QuestionTemplate {
    key: "reflection",
    question_type: QuestionType::Scale,
    topic: "energy",
    question: "\"Time alone helps me sort out my feelings.\" How much do you agree?",
    empathy_prefix: Some("Everyone makes room for reflection differently."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_BODY: QuestionTemplate = QuestionTemplate {
    key: "body_awareness",
    question_type: QuestionType::Scale,
    topic: "body",
    question: "\"I can tune in to how my body feels.\" How much do you agree?",
    empathy_prefix: Some("Body and mind are closely connected."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_BALANCE: QuestionTemplate = QuestionTemplate {
    key: "balance",
    question_type: QuestionType::Scale,
    topic: "balance",
    question: "\"I'm able to keep things in balance.\" How much do you agree?",
    empathy_prefix: Some("A sense of balance is a real strength."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const SCALE_EXPRESSION: QuestionTemplate = QuestionTemplate {
    key: "emotional_expression",
    question_type: QuestionType::Scale,
    topic: "feelings",
    question: "\"I can express my feelings openly.\" How much do you agree?",
    empathy_prefix: Some("People express emotions in many ways."),
    options: SCALE_OPTIONS,
    safety_message: SCALE_SAFETY,
    follow_up: None,
};

const MULTIPLE_SITUATIONS: QuestionTemplate = QuestionTemplate {
    key: "situations",
    question_type: QuestionType::Multiple,
    topic: "situations",
    question: "In which situations do you notice this most? (choose any)",
    empathy_prefix: Some("It can show up in many different moments."),
    options: SITUATION_OPTIONS,
    safety_message: MULTIPLE_SAFETY,
    follow_up: None,
};

const MULTIPLE_SUPPORT: QuestionTemplate = QuestionTemplate {
    key: "support",
    question_type: QuestionType::Multiple,
    topic: "support",
    question: "What kind of support would help you? (choose any)",
    empathy_prefix: Some("Everyone needs something different."),
    options: SUPPORT_OPTIONS,
    safety_message: MULTIPLE_SAFETY,
    follow_up: None,
};

const MULTIPLE_THINKING: QuestionTemplate = QuestionTemplate {
    key: "thinking_process",
    question_type: QuestionType::Multiple,
    topic: "thinking",
    question: "Which ways of thinking suit you? (choose any)",
    empathy_prefix: Some("There is no right way to think."),
    options: THINKING_OPTIONS,
    safety_message: MULTIPLE_SAFETY,
    follow_up: None,
};

/// The generic single-choice question. Also the last-resort fallback.
pub const SINGLE_FEELING: QuestionTemplate = QuestionTemplate {
    key: "feeling",
    question_type: QuestionType::Single,
    topic: "feelings",
    question: "Could you tell me how you're feeling right now?",
    empathy_prefix: Some("Thank you for taking the time."),
    options: FEELING_OPTIONS,
    safety_message: "Every one of these is a valid feeling.",
    follow_up: Some("Could you tell me a little more?"),
};

const SINGLE_PERSPECTIVE: QuestionTemplate = QuestionTemplate {
    key: "perspective",
    question_type: QuestionType::Single,
    topic: "perspective",
    question: "How do you see this situation?",
    empathy_prefix: Some("Everyone sees their situation differently."),
    options: PERSPECTIVE_OPTIONS,
    safety_message: "Any way of seeing it is natural.",
    follow_up: None,
};

/// Returns every template eligible for a type, stage, and profile.
pub fn pool(
    question_type: QuestionType,
    stage: ConversationStage,
    profile: &DiagnosisProfile,
) -> Vec<&'static QuestionTemplate> {
    let mut templates: Vec<&'static QuestionTemplate> = Vec::new();

    match question_type {
        QuestionType::EmotionScale => templates.push(&EMOTION_NOW),
        QuestionType::Scale => {
            templates.extend([&SCALE_WORRY, &SCALE_SATISFACTION, &SCALE_STRESS]);

            if let Some(pt) = &profile.personality_type {
                templates.extend([&SCALE_LOGIC, &SCALE_CONSIDERATION]);
                if pt.is_extraverted() {
                    templates.push(&SCALE_SOCIAL_ENERGY);
                }
                if pt.is_introverted() {
                    templates.push(&SCALE_REFLECTION);
                }
            }

            if let Some(primary) = profile.constitution_primary {
                templates.push(&SCALE_BODY);
                match primary.value() {
                    1 | 2 => templates.push(&SCALE_BALANCE),
                    3 | 4 => templates.push(&SCALE_EXPRESSION),
                    _ => {}
                }
            }
        }
        QuestionType::Multiple => {
            templates.extend([&MULTIPLE_SITUATIONS, &MULTIPLE_SUPPORT]);
            if profile.personality_type.is_some() {
                templates.push(&MULTIPLE_THINKING);
            }
        }
        QuestionType::Single => {
            templates.push(&SINGLE_FEELING);
            if stage != ConversationStage::Warmup {
                templates.push(&SINGLE_PERSPECTIVE);
            }
        }
    }

    templates
}

/// Empathy prefixes used when a template has none of its own.
pub fn stage_prefixes(stage: ConversationStage) -> &'static [&'static str] {
    match stage {
        ConversationStage::Warmup => &[
            "Thank you for taking the time.",
            "Thank you for talking with me.",
            "Take your time.",
        ],
        ConversationStage::Exploration => &[
            "Thank you for sharing how you feel.",
            "I'd be glad to hear a little more.",
            "Your perspective matters here.",
        ],
        ConversationStage::DeepDive => &[
            "Thank you for sharing something so personal.",
            "Thank you for looking inward with me.",
            "Please tell me honestly how you feel.",
        ],
        ConversationStage::Closing => &[
            "Thank you for everything you've shared.",
            "Let me check one last thing.",
            "You've done a lot of work today.",
        ],
    }
}

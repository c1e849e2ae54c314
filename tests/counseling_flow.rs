//! Integration tests for a full counseling session.
//!
//! Drives several turns through the conduct handler with a mock generator,
//! carrying history and asked topics between turns the way a caller would.

use std::io::Write;
use std::sync::Arc;

use counsel_engine::adapters::ai::MockTextGenerator;
use counsel_engine::application::{
    ConductTurnCommand, ConductTurnHandler, PlanTurnCommand, PlanTurnHandler,
};
use counsel_engine::config::EngineConfig;
use counsel_engine::domain::conversation::{
    ConversationHistory, ConversationStage, Message, Role, StageController,
};
use counsel_engine::domain::diagnosis::DiagnosisProfile;
use counsel_engine::domain::foundation::{SessionId, Timestamp};
use counsel_engine::domain::questions::{FixedDraw, QuestionMode};
use counsel_engine::domain::safety::{ResponseAnalysis, SafetyScoreCalculator};
use counsel_engine::ports::GenerationError;

// =============================================================================
// Test Infrastructure
// =============================================================================

const UNRESOLVED: &str = "That sounds like a lot to carry.\n\n```json\n{\"resolved\": false, \"confidence\": 0.3, \"next_action\": \"What weighs on you most?\", \"_reasoning\": \"still exploring\"}\n```";

const RESOLVED: &str = "I'm really glad this helped you.\n\n```json\n{\"resolved\": true, \"confidence\": 0.92, \"next_action\": \"Come back any time.\", \"_reasoning\": \"clear thanks, no new question\"}\n```";

/// Caller-side session state between turns.
struct Session {
    id: SessionId,
    history: ConversationHistory,
    analyses: Vec<ResponseAnalysis>,
    topics: Vec<String>,
    profile: DiagnosisProfile,
    clock: i64,
}

impl Session {
    fn new(profile: DiagnosisProfile) -> Self {
        Self {
            id: SessionId::new(),
            history: ConversationHistory::new(),
            analyses: Vec::new(),
            topics: Vec::new(),
            profile,
            clock: 1_700_000_000,
        }
    }

    fn push(&mut self, role: Role, content: &str) {
        self.clock += 30;
        let message = Message::at(role, content, Timestamp::from_unix_secs(self.clock)).unwrap();
        self.history.append(message).unwrap();
    }

    fn command(&self) -> ConductTurnCommand {
        ConductTurnCommand {
            session_id: self.id,
            turn: PlanTurnCommand {
                messages: self.history.messages().to_vec(),
                history: self.analyses.clone(),
                previous_topics: self.topics.clone(),
                profile: self.profile.clone(),
            },
        }
    }
}

fn seeded_handler(generator: Arc<MockTextGenerator>) -> ConductTurnHandler {
    let mut config = EngineConfig::default();
    config.questions.seed = Some(2024);
    ConductTurnHandler::new(PlanTurnHandler::from_config(&config), generator)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn session_runs_until_resolved() {
    let generator = Arc::new(
        MockTextGenerator::new()
            .with_reply(UNRESOLVED)
            .with_reply(UNRESOLVED)
            .with_reply(RESOLVED),
    );
    let handler = seeded_handler(generator.clone());
    let profile = DiagnosisProfile::new()
        .with_personality_type("INFJ")
        .unwrap()
        .with_constitution(3, 0)
        .unwrap();
    let mut session = Session::new(profile);

    let user_turns = [
        "Honestly, work has been really stressful lately and I keep worrying about my future there.",
        "Actually, I think I am afraid of disappointing my boss, and I feel anxious every Sunday night.",
        "Thank you so much, that really helped. I feel relieved and I know what to try next.",
    ];

    let mut outcomes = Vec::new();
    for user_turn in user_turns {
        session.push(Role::User, user_turn);

        let outcome = handler.handle(session.command()).await.unwrap();

        assert!(!outcome.plan.question.options().is_empty());
        assert!(!outcome.reply.contains("```"));
        if let Some(analysis) = &outcome.plan.safety.analysis {
            session.analyses.push(analysis.clone());
        }
        session.topics.push(outcome.plan.question.topic().to_string());
        session.push(Role::Assistant, &outcome.reply);
        outcomes.push(outcome);
    }

    assert_eq!(generator.call_count(), 3);
    assert!(!outcomes[0].is_resolved());
    assert!(!outcomes[1].is_resolved());
    assert!(outcomes[2].is_resolved());
    assert_eq!(outcomes[2].reply, "I'm really glad this helped you.");

    // Engaged, open replies never trigger recovery mode.
    for outcome in &outcomes {
        assert!(!outcome.plan.recovery_needed());
    }

    // The personalized concern reaches the prompt.
    let prompt = outcomes[0].plan.system_prompt.as_str();
    assert!(prompt.contains("- Personality type: INFJ"));
    assert!(prompt.contains("high sensitivity and boundaries with others"));
}

#[tokio::test]
async fn distressed_user_gets_recovery_and_closed_questions() {
    let generator = Arc::new(MockTextGenerator::new().with_reply("I'm here with you."));
    let planner = PlanTurnHandler::new(
        SafetyScoreCalculator::default(),
        StageController::default(),
        Box::new(FixedDraw::new(vec![0.99])),
    );
    let handler = ConductTurnHandler::new(planner, generator);
    let mut session = Session::new(DiagnosisProfile::new());
    session.push(Role::Assistant, "How are you feeling today?");
    session.push(Role::User, "whatever");

    let outcome = handler.handle(session.command()).await.unwrap();

    assert!(outcome.plan.recovery_needed());
    assert_eq!(outcome.plan.mode, QuestionMode::Closed);
    assert!(!outcome.plan.recovery_actions.is_empty());
    assert!(outcome.decision.is_none());
    assert!(!outcome.is_resolved());
}

#[tokio::test]
async fn low_safety_holds_conversation_in_warmup() {
    let generator = Arc::new(MockTextGenerator::new());
    let handler = seeded_handler(generator);
    let mut session = Session::new(DiagnosisProfile::new());
    for _ in 0..9 {
        session.push(Role::Assistant, "Could you tell me more?");
        session.push(Role::User, "whatever");
    }

    let outcome = handler.handle(session.command()).await.unwrap();

    assert_eq!(outcome.plan.stage.target, ConversationStage::DeepDive);
    assert_eq!(outcome.plan.stage.config.stage, ConversationStage::Warmup);
    assert_eq!(outcome.plan.question.stage(), ConversationStage::Warmup);
}

#[tokio::test]
async fn generator_failure_is_reported() {
    let generator = Arc::new(MockTextGenerator::new().with_error(GenerationError::rate_limited(10)));
    let handler = seeded_handler(generator);
    let mut session = Session::new(DiagnosisProfile::new());
    session.push(Role::User, "Hi, I wanted to talk about my family.");

    let err = handler.handle(session.command()).await.unwrap_err();

    assert!(err.to_string().contains("rate limited"));
}

#[tokio::test]
async fn config_file_drives_stage_ceilings() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[stages]\nwarmup_max_questions = 0\nexploration_max_questions = 1\ndeep_dive_max_questions = 2\n\n[questions]\nseed = 5\n"
    )
    .unwrap();
    let config = EngineConfig::load_from_file(file.path()).unwrap();
    config.validate().unwrap();

    let handler = ConductTurnHandler::new(
        PlanTurnHandler::from_config(&config),
        Arc::new(MockTextGenerator::new()),
    );
    let mut session = Session::new(DiagnosisProfile::new());
    session.push(Role::Assistant, "What brings you here today?");
    session.push(
        Role::User,
        "Honestly, I have been thinking a lot about my career and I am grateful for the chance to talk it through.",
    );

    let outcome = handler.handle(session.command()).await.unwrap();

    assert_eq!(outcome.plan.stage.target, ConversationStage::Exploration);
}

#[test]
fn plan_serializes_for_the_client() {
    let plan = PlanTurnHandler::default().handle(&PlanTurnCommand::default());

    let safety = serde_json::to_value(&plan.safety.score).unwrap();
    let question = serde_json::to_value(&plan.question).unwrap();

    assert_eq!(safety["overall"], 0.5);
    assert_eq!(safety["recovery_needed"], false);
    assert_eq!(question["stage"], "warmup");
    assert!(question["options"].as_array().is_some_and(|o| !o.is_empty()));
}

//! PlanTurnHandler - Decide everything about the next counselor turn

use std::sync::{Mutex, MutexGuard};

use crate::config::EngineConfig;
use crate::domain::conversation::{question_count_of, Message, StageController, StageDecision};
use crate::domain::diagnosis::{DiagnosisProfile, PersonalizationContext};
use crate::domain::prompt::{CounselingPrompt, PromptInputs};
use crate::domain::questions::{ChoiceQuestion, ChoiceQuestionGenerator, QuestionMode, UnitDraw};
use crate::domain::safety::{
    recovery_actions, RecoveryAction, ResponseAnalysis, SafetyAssessment, SafetyScoreCalculator,
};

/// Command to plan the next turn
#[derive(Debug, Clone, Default)]
pub struct PlanTurnCommand {
    /// Conversation so far, oldest first
    pub messages: Vec<Message>,
    /// Analyses of earlier user responses, oldest first
    pub history: Vec<ResponseAnalysis>,
    /// Topics of questions already asked, oldest first
    pub previous_topics: Vec<String>,
    pub profile: DiagnosisProfile,
}

/// Everything decided for the next turn
#[derive(Debug, Clone)]
pub struct TurnPlan {
    pub safety: SafetyAssessment,
    pub stage: StageDecision,
    pub mode: QuestionMode,
    pub question: ChoiceQuestion,
    /// Empty unless recovery is needed or the user pushed back
    pub recovery_actions: Vec<RecoveryAction>,
    pub system_prompt: CounselingPrompt,
}

impl TurnPlan {
    pub fn recovery_needed(&self) -> bool {
        self.safety.score.recovery_needed
    }
}

/// Handler for planning a turn. Pure apart from the random draw.
pub struct PlanTurnHandler {
    calculator: SafetyScoreCalculator,
    controller: StageController,
    draw: Mutex<Box<dyn UnitDraw>>,
}

impl PlanTurnHandler {
    pub fn new(
        calculator: SafetyScoreCalculator,
        controller: StageController,
        draw: Box<dyn UnitDraw>,
    ) -> Self {
        Self {
            calculator,
            controller,
            draw: Mutex::new(draw),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.scoring.calculator(),
            config.stages.controller(),
            config.questions.draw(),
        )
    }

    pub fn handle(&self, cmd: &PlanTurnCommand) -> TurnPlan {
        // 1. Score the latest user response
        let history = (!cmd.history.is_empty()).then_some(cmd.history.as_slice());
        let safety = self.calculator.assess(&cmd.messages, history);

        // 2. Pick the stage, held back while safety is low
        let question_count = question_count_of(&cmd.messages);
        let stage = self.controller.evaluate(question_count, &safety.score);

        // 3. Choose the mode and the question
        let mut draw = self.lock_draw();
        let question = ChoiceQuestionGenerator::new(cmd.profile.clone()).generate(
            &stage.config,
            &cmd.messages,
            &cmd.previous_topics,
            &safety.score,
            &mut **draw,
        );
        drop(draw);
        let mode = question.mode();

        // 4. Recovery steps for the latest response
        let recovery_actions = safety
            .analysis
            .as_ref()
            .map(|analysis| recovery_actions(&safety.score, analysis))
            .unwrap_or_default();

        // 5. Assemble the system prompt
        let personalization = PersonalizationContext::from_profile(&cmd.profile);
        let system_prompt = CounselingPrompt::build(&PromptInputs {
            stage: &stage.config,
            mode,
            safety: &safety.score,
            profile: &cmd.profile,
            personalization: &personalization,
            next_question: Some(&question),
        });

        tracing::debug!(
            question_count,
            stage = %stage.config.stage,
            overall = %safety.score.overall,
            recovery_needed = safety.score.recovery_needed,
            question_id = question.id(),
            "Planned counseling turn"
        );

        TurnPlan {
            safety,
            stage,
            mode,
            question,
            recovery_actions,
            system_prompt,
        }
    }

    fn lock_draw(&self) -> MutexGuard<'_, Box<dyn UnitDraw>> {
        self.draw.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PlanTurnHandler {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

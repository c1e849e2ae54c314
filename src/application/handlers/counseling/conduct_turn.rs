//! ConductTurnHandler - Plan a turn, generate the reply, judge completion

use std::sync::Arc;

use thiserror::Error;

use super::plan_turn::{PlanTurnCommand, PlanTurnHandler, TurnPlan};
use crate::domain::completion::{self, CompletionDecision};
use crate::domain::conversation::token_budget;
use crate::domain::foundation::SessionId;
use crate::ports::{FinishReason, GenerationError, GenerationRequest, TextGenerator};

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Command to conduct one counselor turn
#[derive(Debug, Clone)]
pub struct ConductTurnCommand {
    pub session_id: SessionId,
    pub turn: PlanTurnCommand,
}

/// Result of a conducted turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub plan: TurnPlan,
    /// Reply text with the judgment JSON removed
    pub reply: String,
    /// Absent when the model gave no usable judgment
    pub decision: Option<CompletionDecision>,
    pub model: String,
}

impl TurnOutcome {
    /// False unless a valid judgment marked the concern resolved.
    pub fn is_resolved(&self) -> bool {
        self.decision
            .as_ref()
            .is_some_and(CompletionDecision::is_resolved)
    }
}

/// Error type for conducting a turn
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConductTurnError {
    #[error("Text generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Handler for conducting a turn
pub struct ConductTurnHandler {
    planner: PlanTurnHandler,
    generator: Arc<dyn TextGenerator>,
    /// Fixed reply budget; the stage budget applies when unset
    max_tokens: Option<u32>,
    temperature: f32,
}

impl ConductTurnHandler {
    pub fn new(planner: PlanTurnHandler, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            planner,
            generator,
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub async fn handle(&self, cmd: ConductTurnCommand) -> Result<TurnOutcome, ConductTurnError> {
        // 1. Plan the turn
        let plan = self.planner.handle(&cmd.turn);

        // 2. Generate the reply within the stage's token budget
        let max_tokens = self
            .max_tokens
            .unwrap_or_else(|| token_budget(plan.stage.config.stage, &cmd.turn.messages));
        let request = GenerationRequest::new(cmd.session_id, plan.system_prompt.as_str())
            .with_history(&cmd.turn.messages)
            .with_max_tokens(max_tokens)
            .with_temperature(self.temperature);

        let response = self.generator.generate(request).await.map_err(|err| {
            tracing::warn!(session_id = %cmd.session_id, error = %err, "Reply generation failed");
            err
        })?;

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(session_id = %cmd.session_id, "Reply hit the token limit");
        }

        // 3. Judge completion; a bad judgment never fails the turn
        let decision = completion::parse(&response.content);
        let reply = completion::strip_decision(&response.content);

        tracing::info!(
            session_id = %cmd.session_id,
            stage = %plan.stage.config.stage,
            resolved = decision.as_ref().is_some_and(CompletionDecision::is_resolved),
            judged = decision.is_some(),
            "Counseling turn complete"
        );

        Ok(TurnOutcome {
            plan,
            reply,
            decision,
            model: response.model,
        })
    }
}

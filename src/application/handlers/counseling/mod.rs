//! Counseling Command Handlers
//!
//! ## Commands
//! - `PlanTurn` - Score safety, pick stage and question, assemble the prompt
//! - `ConductTurn` - Plan, generate the reply, and judge completion

mod conduct_turn;
mod plan_turn;

pub use conduct_turn::{ConductTurnCommand, ConductTurnError, ConductTurnHandler, TurnOutcome};
pub use plan_turn::{PlanTurnCommand, PlanTurnHandler, TurnPlan};

//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod counseling;

pub use counseling::{
    ConductTurnCommand, ConductTurnError, ConductTurnHandler, PlanTurnCommand, PlanTurnHandler,
    TurnOutcome, TurnPlan,
};

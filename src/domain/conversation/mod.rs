//! Conversation module - messages, stages, stage control, and reply budgets.

mod message;
mod stage;
mod stage_controller;
mod token_budget;

pub use message::{ConversationHistory, Message, MessageId, Role};
pub use stage::ConversationStage;
pub use stage_controller::{question_count_of, select_mode, StageConfig, StageController, StageDecision};
pub use token_budget::{estimate_context_tokens, token_budget};

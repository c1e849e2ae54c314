//! Domain layer: pure, synchronous counseling logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, unit scores, errors)
//! - `conversation` - Messages, stages and the stage controller
//! - `safety` - Response analysis and the psychological safety score
//! - `questions` - Choice question templates and generation
//! - `diagnosis` - Diagnosis profile and personalization
//! - `completion` - Parsing the model's end-of-conversation judgment
//! - `prompt` - System prompt assembly
//! - `thresholds` - Fixed scoring and stage constants

pub mod completion;
pub mod conversation;
pub mod diagnosis;
pub mod foundation;
pub mod prompt;
pub mod questions;
pub mod safety;
pub mod thresholds;

//! Ports: interfaces the engine needs from the outside world.

mod text_generator;

pub use text_generator::{
    FinishReason, GenerationError, GenerationRequest, GenerationResponse, PromptMessage,
    TextGenerator,
};

//! Completion detection: did the user's concern get resolved?

mod decision;
mod parser;

pub use decision::CompletionDecision;
pub use parser::{parse, sanitize, strip_decision};

//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the counseling engine.

mod errors;
mod ids;
mod timestamp;
mod unit_score;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::SessionId;
pub use timestamp::Timestamp;
pub use unit_score::UnitScore;

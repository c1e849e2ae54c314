//! Unit-interval score value object (0.0 to 1.0).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A finite value between 0.0 and 1.0 inclusive.
///
/// Deserialization goes through [`UnitScore::try_new`], so stored or wire
/// values outside the interval are rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UnitScore(f64);

impl UnitScore {
    /// Zero.
    pub const ZERO: Self = Self(0.0);

    /// Neutral midpoint, used when there is nothing to score.
    pub const NEUTRAL: Self = Self(0.5);

    /// One.
    pub const ONE: Self = Self(1.0);

    /// Creates a new UnitScore, clamping to the unit interval. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a UnitScore, returning error if not finite or out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::not_a_unit_value("score", value));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value scaled by a weight.
    pub fn weighted(&self, weight: f64) -> f64 {
        self.0 * weight
    }
}

impl Default for UnitScore {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for UnitScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<UnitScore> for f64 {
    fn from(score: UnitScore) -> Self {
        score.0
    }
}

impl TryFrom<f64> for UnitScore {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

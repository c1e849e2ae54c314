//! Safety scoring configuration

use serde::Deserialize;

use super::ValidationError;
use crate::domain::safety::{SafetyScoreCalculator, ScoringWeights};
use crate::domain::thresholds::{safety, weights};

const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Weights of the three conditions and the recovery threshold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_self_congruence")]
    pub self_congruence: f64,

    #[serde(default = "default_positive_regard")]
    pub unconditional_positive_regard: f64,

    #[serde(default = "default_empathic_understanding")]
    pub empathic_understanding: f64,

    /// Overall score below which recovery mode starts
    #[serde(default = "default_recovery_threshold")]
    pub recovery_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            self_congruence: default_self_congruence(),
            unconditional_positive_regard: default_positive_regard(),
            empathic_understanding: default_empathic_understanding(),
            recovery_threshold: default_recovery_threshold(),
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            self_congruence: self.self_congruence,
            unconditional_positive_regard: self.unconditional_positive_regard,
            empathic_understanding: self.empathic_understanding,
        }
    }

    pub fn calculator(&self) -> SafetyScoreCalculator {
        SafetyScoreCalculator::new(self.weights(), self.recovery_threshold)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("self_congruence", self.self_congruence),
            ("unconditional_positive_regard", self.unconditional_positive_regard),
            ("empathic_understanding", self.empathic_understanding),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::WeightOutOfRange { name, value });
            }
        }

        let sum: f64 = named.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ValidationError::WeightsDoNotSumToOne { sum });
        }

        if !(self.recovery_threshold > 0.0 && self.recovery_threshold < 1.0) {
            return Err(ValidationError::ThresholdOutOfRange {
                name: "recovery_threshold",
                value: self.recovery_threshold,
            });
        }
        Ok(())
    }
}

fn default_self_congruence() -> f64 {
    weights::SELF_CONGRUENCE
}

fn default_positive_regard() -> f64 {
    weights::UNCONDITIONAL_POSITIVE_REGARD
}

fn default_empathic_understanding() -> f64 {
    weights::EMPATHIC_UNDERSTANDING
}

fn default_recovery_threshold() -> f64 {
    safety::LOW
}

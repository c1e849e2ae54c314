//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Scoring weights must sum to 1.0, got {sum:.3}")]
    WeightsDoNotSumToOne { sum: f64 },

    #[error("Weight {name} must be between 0 and 1, got {value}")]
    WeightOutOfRange { name: &'static str, value: f64 },

    #[error("Threshold {name} must be strictly between 0 and 1, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("Stage question ceilings must strictly increase (warmup {warmup}, exploration {exploration}, deep_dive {deep_dive})")]
    CeilingsNotIncreasing {
        warmup: u32,
        exploration: u32,
        deep_dive: u32,
    },

    #[error("Log filter must not be empty")]
    EmptyLogFilter,
}

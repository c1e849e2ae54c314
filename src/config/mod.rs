//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! and an optional TOML file using the `config` and `dotenvy` crates. Configuration
//! is loaded with the `COUNSEL_ENGINE` prefix and nested values use `__` as separator.
//! Every field has a default, so an empty environment yields a working engine.
//!
//! # Example
//!
//! ```no_run
//! use counsel_engine::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init().expect("Failed to install subscriber");
//! ```

mod error;
mod logging;
mod questions;
mod scoring;
mod stages;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use questions::QuestionsConfig;
pub use scoring::ScoringConfig;
pub use stages::StagesConfig;

use std::path::Path;

use serde::Deserialize;

const ENV_PREFIX: &str = "COUNSEL_ENGINE";
const ENV_SEPARATOR: &str = "__";

/// Root engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Condition weights and recovery threshold
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Question ceilings per stage
    #[serde(default)]
    pub stages: StagesConfig,

    /// Question sampling
    #[serde(default)]
    pub questions: QuestionsConfig,

    /// Tracing subscriber
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables such as
    /// `COUNSEL_ENGINE__SCORING__RECOVERY_THRESHOLD=0.35`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` if a value cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variables on top
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::File::from(path.as_ref()).format(config::FileFormat::Toml),
            )
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for weights that do not sum to one,
    /// thresholds outside (0, 1), or stage ceilings that do not increase.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scoring.validate()?;
        self.stages.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

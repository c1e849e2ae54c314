//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use super::ValidationError;

/// Subscriber settings. `RUST_LOG` overrides `filter` when set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Installs the global subscriber. Fails if one is already installed.
    pub fn init(&self) -> Result<(), TryInitError> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter));
        let registry = tracing_subscriber::registry().with(filter);

        if self.json {
            registry.with(fmt::layer().json()).try_init()
        } else {
            registry.with(fmt::layer()).try_init()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filter.trim().is_empty() {
            return Err(ValidationError::EmptyLogFilter);
        }
        Ok(())
    }
}

fn default_filter() -> String {
    "counsel_engine=info".to_string()
}

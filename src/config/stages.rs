//! Stage progression configuration

use serde::Deserialize;

use super::ValidationError;
use crate::domain::conversation::StageController;

/// Question ceilings for the bounded stages. Closing is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StagesConfig {
    #[serde(default = "default_warmup")]
    pub warmup_max_questions: u32,

    #[serde(default = "default_exploration")]
    pub exploration_max_questions: u32,

    #[serde(default = "default_deep_dive")]
    pub deep_dive_max_questions: u32,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            warmup_max_questions: default_warmup(),
            exploration_max_questions: default_exploration(),
            deep_dive_max_questions: default_deep_dive(),
        }
    }
}

impl StagesConfig {
    pub fn controller(&self) -> StageController {
        StageController::new(
            self.warmup_max_questions,
            self.exploration_max_questions,
            self.deep_dive_max_questions,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.warmup_max_questions < self.exploration_max_questions
            && self.exploration_max_questions < self.deep_dive_max_questions
        {
            return Ok(());
        }
        Err(ValidationError::CeilingsNotIncreasing {
            warmup: self.warmup_max_questions,
            exploration: self.exploration_max_questions,
            deep_dive: self.deep_dive_max_questions,
        })
    }
}

fn default_warmup() -> u32 {
    2
}

fn default_exploration() -> u32 {
    7
}

fn default_deep_dive() -> u32 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ConversationStage;

    #[test]
    fn defaults_are_valid() {
        let config = StagesConfig::default();
        assert_eq!(
            (config.warmup_max_questions, config.exploration_max_questions, config.deep_dive_max_questions),
            (2, 7, 15)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_equal_ceilings() {
        let config = StagesConfig {
            exploration_max_questions: 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::CeilingsNotIncreasing { warmup: 2, exploration: 2, .. })
        ));
    }

    #[test]
    fn controller_uses_configured_ceilings() {
        let config = StagesConfig {
            warmup_max_questions: 1,
            exploration_max_questions: 3,
            deep_dive_max_questions: 5,
        };
        let controller = config.controller();
        assert_eq!(controller.target_stage(2), ConversationStage::Exploration);
        assert_eq!(controller.target_stage(6), ConversationStage::Closing);
    }
}

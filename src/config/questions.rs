//! Question generation configuration

use serde::Deserialize;

use crate::domain::questions::{SeededDraw, UnitDraw};

/// Randomness used for question type and mode selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionsConfig {
    /// Fixed seed for reproducible sessions. Entropy-seeded when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl QuestionsConfig {
    pub fn draw(&self) -> Box<dyn UnitDraw> {
        match self.seed {
            Some(seed) => Box::new(SeededDraw::from_seed(seed)),
            None => Box::new(SeededDraw::from_entropy()),
        }
    }
}

//! Choice question generation.

mod choice_question;
mod draw;
mod generator;
mod templates;

pub use choice_question::{
    ChoiceOption, ChoiceQuestion, ChoiceQuestionParts, QuestionMode, QuestionType,
};
pub use draw::{FixedDraw, SeededDraw, UnitDraw};
pub use generator::{select_question_type, ChoiceQuestionGenerator};

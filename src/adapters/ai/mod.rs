//! Text generator adapters.

mod mock_generator;

pub use mock_generator::{MockReply, MockTextGenerator};

//! Text processing: whitespace normalization and sentence boundary models.

mod cleaner;
pub mod sentences;
mod seams;

pub use cleaner::normalize_text;
pub use seams::SeamsSentenceModel;
pub use sentences::RussianSentenceModel;

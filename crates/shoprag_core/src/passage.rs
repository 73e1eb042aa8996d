//! Knowledge-base passages.

use serde::{Deserialize, Serialize};

/// A ranked knowledge-base snippet used to ground an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Passage {
    /// Stable chunk identifier
    chunk_id: String,
    /// Passage text
    text: String,
    /// Where the passage came from (URL, document name)
    #[serde(default)]
    source: String,
    /// Publication date as written in the source
    #[serde(default)]
    date: String,
    /// Relevance score; zero until scored by a retriever
    #[serde(default)]
    score: f32,
}

impl Passage {
    /// Creates an unscored passage.
    pub fn new(
        chunk_id: impl Into<String>,
        text: impl Into<String>,
        source: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            text: text.into(),
            source: source.into(),
            date: date.into(),
            score: 0.0,
        }
    }

    /// Returns a copy of this passage carrying the given score.
    pub fn with_score(&self, score: f32) -> Self {
        Self {
            score,
            ..self.clone()
        }
    }
}

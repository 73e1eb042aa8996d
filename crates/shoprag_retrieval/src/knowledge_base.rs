//! Knowledge-base file loading.

use shoprag_core::Passage;
use shoprag_error::{JsonError, RetrievalError, ShopragResult};
use std::path::Path;

/// Pre-chunked passages in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    passages: Vec<Passage>,
}

impl KnowledgeBase {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Loads passages from a JSON array of `{chunk_id, text, source, date}`
    /// objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a passage array.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ShopragResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RetrievalError::new(format!(
                "Failed to read knowledge base {}: {}",
                path.display(),
                e
            ))
        })?;

        let passages: Vec<Passage> = serde_json::from_str(&content).map_err(|e| {
            JsonError::new(format!(
                "Invalid knowledge base {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(passages = passages.len(), "Loaded knowledge base");
        Ok(Self::new(passages))
    }

    /// Loads passages, or starts empty when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_empty(path: impl AsRef<Path>) -> ShopragResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Knowledge base file not found, answering without grounding passages"
            );
            return Ok(Self::default());
        }
        Self::from_file(path)
    }
}

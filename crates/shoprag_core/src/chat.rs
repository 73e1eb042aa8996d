//! Public chat request/response types.

use crate::Passage;
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation identifier chosen by the client
    pub conversation_id: String,
    /// User message
    pub message: String,
}

/// A retrieved passage as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub chunk_id: String,
    pub text: String,
    pub source: String,
    pub score: f32,
}

impl From<&Passage> for ChunkInfo {
    fn from(passage: &Passage) -> Self {
        Self {
            chunk_id: passage.chunk_id().clone(),
            text: passage.text().clone(),
            source: passage.source().clone(),
            score: *passage.score(),
        }
    }
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Conversation identifier echoed back
    pub conversation_id: String,
    /// Agent answer
    pub answer: String,
    /// Passages the answer was grounded on
    #[serde(default)]
    pub chunks: Vec<ChunkInfo>,
    /// Last scenario node executed on this turn, empty if none
    #[serde(default)]
    pub last_step_scenario: String,
}

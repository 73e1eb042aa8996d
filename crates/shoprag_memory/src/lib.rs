//! Conversation memory for the OnlineShopRAG support backend.
//!
//! Each conversation keeps its full message log plus a rolling summary of
//! the messages that have slid out of the prompt window.

mod memory;

pub use memory::{
    ConversationMemory, DEFAULT_MAX_HISTORY_MESSAGES, EMPTY_HISTORY, SUMMARY_SYSTEM_PROMPT,
};

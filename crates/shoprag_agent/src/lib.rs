//! Orchestration layer of the OnlineShopRAG support backend.
//!
//! [`SupportAgent`] turns one user message into one answer: it runs the
//! scenario on first contact, retrieves grounding passages, assembles the
//! answer prompt from scenario text, passages and conversation memory, and
//! asks the language model.

mod agent;
mod prompt;

pub use agent::{AgentConfig, SupportAgent};
pub use prompt::{ANSWER_SYSTEM_PROMPT, AnswerPrompt};

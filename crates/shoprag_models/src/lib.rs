//! LLM provider integrations for the OnlineShopRAG support backend.
//!
//! The deployment talks to OpenRouter (or any other OpenAI-compatible
//! endpoint) through [`OpenAICompatibleClient`], which implements
//! [`shoprag_interface::LlmDriver`].

pub mod openai_compat;
mod retry;

pub use openai_compat::{OpenAICompatConfig, OpenAICompatConfigBuilder, OpenAICompatibleClient};
pub use retry::{RetryConfig, retry_with_backoff};

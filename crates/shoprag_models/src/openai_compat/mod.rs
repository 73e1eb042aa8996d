//! Generic OpenAI-compatible API client.
//!
//! This module provides a client for any API that follows the OpenAI chat
//! completions format (OpenRouter, OpenAI, vLLM, llama.cpp server, ...).

mod client;
mod conversions;
mod dto;

pub use client::{OpenAICompatConfig, OpenAICompatConfigBuilder, OpenAICompatibleClient};
pub use conversions::{from_chat_response, to_chat_request};
pub use dto::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatUsage, OpenAICompatError};

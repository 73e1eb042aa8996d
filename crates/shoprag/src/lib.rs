//! OnlineShopRAG: a retrieval-augmented customer-support chat backend.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`shoprag_core`]: messages, requests, passages, chat DTOs
//! - [`shoprag_error`]: location-tracked errors
//! - [`shoprag_interface`]: the `LlmDriver` and `Retriever` seams
//! - [`shoprag_models`]: the OpenAI-compatible client
//! - [`shoprag_scenario`]: the first-contact scenario interpreter
//! - [`shoprag_retrieval`]: knowledge-base retrieval
//! - [`shoprag_memory`]: conversation memory
//! - [`shoprag_agent`]: the support agent
//! - [`shoprag_server`]: settings and the HTTP API

pub mod cli;

pub use shoprag_agent::{AgentConfig, AnswerPrompt, SupportAgent};
pub use shoprag_core::{
    ChatRequest, ChatResponse, ChunkInfo, GenerateRequest, GenerateResponse, LogFormat, Message,
    Passage, Role, TokenUsage, init_tracing,
};
pub use shoprag_error::{ShopragError, ShopragErrorKind, ShopragResult};
pub use shoprag_interface::{LlmDriver, Retriever};
pub use shoprag_memory::ConversationMemory;
pub use shoprag_models::{OpenAICompatConfig, OpenAICompatibleClient};
pub use shoprag_retrieval::{KeywordRetriever, KnowledgeBase};
pub use shoprag_scenario::{
    ConditionEvaluator, Node, ScenarioInterpreter, ScenarioOutcome, ScenarioRunner, Script,
    ScriptValidator, Tool, ToolRegistry,
};
pub use shoprag_server::{Settings, build_agent, create_router, serve};

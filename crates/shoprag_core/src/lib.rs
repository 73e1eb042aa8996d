//! Core data types for the OnlineShopRAG support backend.
//!
//! This crate provides the plain data shared by every other crate: chat
//! messages, generation requests and responses, knowledge-base passages and
//! the public chat DTOs.

mod chat;
mod message;
mod observability;
mod passage;
mod request;
mod role;

pub use chat::{ChatRequest, ChatResponse, ChunkInfo};
pub use message::Message;
pub use observability::{LogFormat, init_tracing};
pub use passage::Passage;
pub use request::{GenerateRequest, GenerateResponse, TokenUsage};
pub use role::Role;

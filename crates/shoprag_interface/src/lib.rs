//! Trait definitions for the OnlineShopRAG support backend.
//!
//! The orchestration layer and the scenario engine only talk to external
//! services through these seams, so tests can swap in canned doubles.

mod driver;
mod retriever;

pub use driver::LlmDriver;
pub use retriever::Retriever;

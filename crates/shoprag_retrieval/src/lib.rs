//! Knowledge-base retrieval for the OnlineShopRAG support backend.
//!
//! The knowledge base is a JSON array of pre-chunked passages. The
//! [`KeywordRetriever`] ranks them with BM25 over stemmed terms; callers then apply
//! [`select_passages`] and render the survivors with [`format_context`].

mod keyword;
mod knowledge_base;
mod select;

pub use keyword::{KeywordRetriever, tokenize};
pub use knowledge_base::KnowledgeBase;
pub use select::{format_context, select_passages};

//! Knowledge-base retrieval trait.

use async_trait::async_trait;
use shoprag_core::Passage;
use shoprag_error::ShopragResult;

/// Returns passages relevant to free text, best first.
///
/// Implementations may leave out passages that do not match at all.
/// Score thresholds and limits are applied by the caller.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve scored passages for a query.
    async fn retrieve(&self, query: &str) -> ShopragResult<Vec<Passage>>;
}

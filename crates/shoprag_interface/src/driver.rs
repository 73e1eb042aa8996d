//! Language model driver trait.

use async_trait::async_trait;
use shoprag_core::{GenerateRequest, GenerateResponse};
use shoprag_error::ShopragResult;
use std::sync::Arc;

/// A chat-completion capable language model.
///
/// Drivers are stateless from the caller's point of view: every call carries
/// the full message list, and one driver instance may serve many concurrent
/// conversations.
#[async_trait]
pub trait LlmDriver: Send + Sync {
    /// Generate a completion for the request.
    async fn generate(&self, req: &GenerateRequest) -> ShopragResult<GenerateResponse>;

    /// Provider name for logging (e.g. "openrouter").
    fn provider_name(&self) -> &'static str;

    /// Model identifier used by this driver.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: LlmDriver + ?Sized> LlmDriver for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> ShopragResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

//! Generic client for OpenAI-compatible APIs.

use crate::openai_compat::{ChatResponse, OpenAICompatError, conversions};
use crate::{RetryConfig, retry_with_backoff};
use async_trait::async_trait;
use derive_getters::Getters;
use reqwest::Client;
use shoprag_core::{GenerateRequest, GenerateResponse};
use shoprag_error::{BackendError, HttpError, ShopragError, ShopragResult};
use shoprag_interface::LlmDriver;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct OpenAICompatConfig {
    /// API key sent as a bearer token
    api_key: String,
    /// Default model identifier
    model: String,
    /// Base URL, e.g. "https://openrouter.ai/api/v1"
    base_url: String,
    /// Name of the provider (for logging/tracing)
    #[builder(default = "\"openai-compatible\"")]
    provider_name: &'static str,
    /// Default sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Default completion length limit
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Per-request timeout
    #[builder(default = "Duration::from_secs(60)")]
    timeout: Duration,
    /// Retry policy for transient failures
    #[builder(default)]
    retry: RetryConfig,
}

impl OpenAICompatConfig {
    /// Creates a new builder for OpenAICompatConfig.
    pub fn builder() -> OpenAICompatConfigBuilder {
        OpenAICompatConfigBuilder::default()
    }
}

/// Generic client for any OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    config: OpenAICompatConfig,
    endpoint: String,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    #[instrument(skip(config), fields(provider = config.provider_name, model = %config.model()))]
    pub fn new(config: OpenAICompatConfig) -> ShopragResult<Self> {
        let client = Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!("{}/chat/completions", config.base_url().trim_end_matches('/'));

        debug!(
            provider = config.provider_name,
            model = %config.model(),
            url = %endpoint,
            "Created OpenAI-compatible client"
        );

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one chat completion request without retrying.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, req), fields(provider = self.config.provider_name, model = %self.config.model()))]
    pub async fn send(&self, req: &GenerateRequest) -> Result<GenerateResponse, OpenAICompatError> {
        let chat_request = conversions::to_chat_request(
            req,
            self.config.model(),
            *self.config.temperature(),
            *self.config.max_tokens(),
        )?;

        debug!(
            message_count = chat_request.messages().len(),
            "Sending request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.config.api_key())
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.config.provider_name, error = ?e, "HTTP request failed");
                OpenAICompatError::Http(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                provider = self.config.provider_name,
                status = %status,
                error = %error_text,
                "API error"
            );

            return Err(OpenAICompatError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = self.config.provider_name, error = ?e, "Failed to parse response");
            OpenAICompatError::ResponseParsing(format!("Failed to parse JSON: {}", e))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");

        conversions::from_chat_response(&chat_response)
    }
}

/// Maps a provider error onto the crate-level error.
#[track_caller]
fn to_shoprag_error(err: OpenAICompatError) -> ShopragError {
    match err {
        OpenAICompatError::Http(message) => HttpError::new(message).into(),
        other => BackendError::new(other.to_string()).into(),
    }
}

#[async_trait]
impl LlmDriver for OpenAICompatibleClient {
    async fn generate(&self, req: &GenerateRequest) -> ShopragResult<GenerateResponse> {
        retry_with_backoff(
            self.config.retry(),
            || self.send(req),
            OpenAICompatError::is_retryable,
        )
        .await
        .map_err(to_shoprag_error)
    }

    fn provider_name(&self) -> &'static str {
        self.config.provider_name
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

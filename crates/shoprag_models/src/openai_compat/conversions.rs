//! Type conversions between shoprag and OpenAI formats.

use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse, OpenAICompatError};
use shoprag_core::{GenerateRequest, GenerateResponse, Role, TokenUsage};

/// Converts a GenerateRequest to OpenAI chat format.
///
/// Request-level `model` and `temperature` override the client defaults.
pub fn to_chat_request(
    req: &GenerateRequest,
    default_model: &str,
    default_temperature: Option<f32>,
    default_max_tokens: Option<u32>,
) -> Result<ChatRequest, OpenAICompatError> {
    if req.messages.is_empty() {
        return Err(OpenAICompatError::InvalidRequest(
            "Request must contain at least one message".to_string(),
        ));
    }

    let messages: Vec<ChatMessage> = req
        .messages
        .iter()
        .map(|msg| {
            let role = match msg.role() {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            ChatMessage {
                role: role.to_string(),
                content: msg.content().clone(),
            }
        })
        .collect();

    let model = req.model.clone().unwrap_or_else(|| default_model.to_string());

    let mut builder = ChatRequest::builder();
    builder.model(model).messages(messages);

    if let Some(max_tokens) = req.max_tokens.or(default_max_tokens) {
        builder.max_tokens(max_tokens);
    }

    if let Some(temp) = req.temperature.or(default_temperature) {
        builder.temperature(temp);
    }

    builder
        .build()
        .map_err(|e| OpenAICompatError::Builder(format!("Failed to build request: {}", e)))
}

/// Converts an OpenAI chat response to a GenerateResponse.
pub fn from_chat_response(response: &ChatResponse) -> Result<GenerateResponse, OpenAICompatError> {
    let text = response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| OpenAICompatError::ResponseParsing("No choices in response".to_string()))?;

    let usage = response.usage.as_ref().and_then(|u| {
        match (u.prompt_tokens, u.completion_tokens, u.total_tokens) {
            (Some(input), Some(output), Some(total)) => Some(TokenUsage::new(input, output, total)),
            _ => None,
        }
    });

    Ok(GenerateResponse { text, usage })
}

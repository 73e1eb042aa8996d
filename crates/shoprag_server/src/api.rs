//! HTTP API for the support chat.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use shoprag_agent::SupportAgent;
use shoprag_core::{ChatRequest, ChatResponse};
use shoprag_error::ShopragError;
use shoprag_interface::{LlmDriver, Retriever};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

/// Shared handler state.
pub struct AppState<D, R> {
    pub agent: Arc<SupportAgent<D, R>>,
}

impl<D, R> Clone for AppState<D, R> {
    fn clone(&self) -> Self {
        Self {
            agent: Arc::clone(&self.agent),
        }
    }
}

/// Failure of an API request, rendered as `{"detail": ...}`.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// The request is well-formed JSON but unusable
    #[display("{}", _0)]
    Unprocessable(String),
    /// The turn failed
    #[display("{}", _0)]
    Internal(ShopragError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Creates the API router.
pub fn create_router<D, R>(agent: Arc<SupportAgent<D, R>>) -> Router
where
    D: LlmDriver + 'static,
    R: Retriever + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat::<D, R>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { agent })
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Answers one chat message.
#[instrument(skip(state, request), fields(conversation_id = %request.conversation_id))]
async fn chat<D, R>(
    State(state): State<AppState<D, R>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError>
where
    D: LlmDriver + 'static,
    R: Retriever + 'static,
{
    if request.conversation_id.trim().is_empty() {
        return Err(ApiError::Unprocessable(
            "conversation_id must not be empty".to_string(),
        ));
    }
    if request.message.trim().is_empty() {
        return Err(ApiError::Unprocessable("message must not be empty".to_string()));
    }

    info!("Chat request received");
    match state
        .agent
        .handle_message(&request.conversation_id, &request.message)
        .await
    {
        Ok(response) => {
            info!(chunks = response.chunks.len(), "Answer ready");
            Ok(Json(response))
        }
        Err(e) => {
            error!(error = %e, "Failed to handle chat request");
            Err(ApiError::Internal(e))
        }
    }
}

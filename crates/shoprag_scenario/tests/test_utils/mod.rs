//! Test doubles for scenario tests.

use async_trait::async_trait;
use shoprag_core::{GenerateRequest, GenerateResponse};
use shoprag_error::{BackendError, ShopragResult};
use shoprag_interface::LlmDriver;
use std::sync::Mutex;
use std::time::Duration;

/// How the mock classifier answers.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockBehavior {
    /// Answer "да" when the user message contains the marker, "нет" otherwise
    YesWhenMessageContains(String),
    /// Always return this text
    Fixed(String),
    /// Always fail
    Fail,
    /// Never answer within any reasonable timeout
    Hang,
}

/// Condition classifier double that records every request.
#[derive(Debug)]
pub struct MockClassifier {
    behavior: MockBehavior,
    calls: Mutex<Vec<GenerateRequest>>,
}

#[allow(dead_code)]
impl MockClassifier {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(answer: &str) -> Self {
        Self::new(MockBehavior::Fixed(answer.to_string()))
    }

    pub fn calls(&self) -> Vec<GenerateRequest> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl LlmDriver for MockClassifier {
    async fn generate(&self, req: &GenerateRequest) -> ShopragResult<GenerateResponse> {
        self.calls.lock().expect("lock poisoned").push(req.clone());

        match &self.behavior {
            MockBehavior::YesWhenMessageContains(marker) => {
                let user_content = req
                    .messages
                    .last()
                    .map(|m| m.content().clone())
                    .unwrap_or_default();
                let message = user_content
                    .split("Сообщение пользователя:")
                    .nth(1)
                    .unwrap_or_default();
                let answer = if message.contains(marker.as_str()) {
                    "да"
                } else {
                    "нет"
                };
                Ok(GenerateResponse::text(answer))
            }
            MockBehavior::Fixed(answer) => Ok(GenerateResponse::text(answer.clone())),
            MockBehavior::Fail => Err(BackendError::new("classifier unavailable").into()),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(GenerateResponse::text("да"))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-classifier"
    }
}

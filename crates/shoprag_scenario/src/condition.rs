//! LLM-backed evaluation of `if` node conditions.

use shoprag_core::{GenerateRequest, Message};
use shoprag_interface::LlmDriver;
use std::time::Duration;

/// Affirmative answer prefix for Russian-language deployments.
pub const DEFAULT_AFFIRMATIVE_TOKEN: &str = "да";

/// Upper bound on a single classification call.
pub const DEFAULT_CONDITION_TIMEOUT: Duration = Duration::from_secs(15);

/// Instructions sent with every classification request.
pub const CONDITION_SYSTEM_PROMPT: &str = "Ты классификатор сообщений службы поддержки интернет-магазина. \
Определи, выполняется ли условие для сообщения пользователя. \
Ответь одним словом: \"да\" или \"нет\".";

/// Whether a classifier answer counts as "yes".
///
/// The answer is trimmed and lower-cased, then checked for the affirmative
/// prefix. Everything else, the empty string included, is "no".
///
/// # Examples
///
/// ```
/// use shoprag_scenario::is_affirmative;
///
/// assert!(is_affirmative("да, это так", "да"));
/// assert!(is_affirmative("  Да.", "да"));
/// assert!(!is_affirmative("нет", "да"));
/// assert!(!is_affirmative("", "да"));
/// ```
pub fn is_affirmative(answer: &str, affirmative_token: &str) -> bool {
    let token = affirmative_token.trim().to_lowercase();
    !token.is_empty() && answer.trim().to_lowercase().starts_with(&token)
}

/// Decides `if` conditions by asking a language model.
///
/// Never fails: driver errors, timeouts and unexpected answers all evaluate
/// to `false`, which sends the run down the `else` branch.
#[derive(Debug, Clone)]
pub struct ConditionEvaluator<D> {
    driver: D,
    affirmative_token: String,
    timeout: Duration,
}

impl<D: LlmDriver> ConditionEvaluator<D> {
    /// Creates an evaluator with the default token and timeout.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            affirmative_token: DEFAULT_AFFIRMATIVE_TOKEN.to_string(),
            timeout: DEFAULT_CONDITION_TIMEOUT,
        }
    }

    pub fn with_affirmative_token(mut self, token: impl Into<String>) -> Self {
        self.affirmative_token = token.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn affirmative_token(&self) -> &str {
        &self.affirmative_token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the classification request for a condition and user message.
    pub fn request(condition: &str, user_message: &str) -> GenerateRequest {
        GenerateRequest::new(vec![
            Message::system(CONDITION_SYSTEM_PROMPT),
            Message::user(format!(
                "Условие: {}\nСообщение пользователя: {}",
                condition, user_message
            )),
        ])
        .with_temperature(0.0)
    }

    /// Evaluate `condition` against the user's message.
    #[tracing::instrument(skip(self, user_message), fields(provider = self.driver.provider_name()))]
    pub async fn evaluate(&self, condition: &str, user_message: &str) -> bool {
        let request = Self::request(condition, user_message);

        match tokio::time::timeout(self.timeout, self.driver.generate(&request)).await {
            Ok(Ok(response)) => {
                let met = is_affirmative(&response.text, &self.affirmative_token);
                tracing::debug!(answer = %response.text.trim(), met, "Condition classified");
                met
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Condition check failed, treating as false");
                false
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Condition check timed out, treating as false"
                );
                false
            }
        }
    }
}

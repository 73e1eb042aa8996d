//! In-process conversation store.

use parking_lot::RwLock;
use shoprag_core::{GenerateRequest, Message, Role};
use shoprag_interface::LlmDriver;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Messages shown in prompts when no limit is configured.
pub const DEFAULT_MAX_HISTORY_MESSAGES: usize = 20;

/// Rendered history of a conversation without messages.
pub const EMPTY_HISTORY: &str = "Истории диалога нет.";

/// Instructions for folding old messages into the rolling summary.
pub const SUMMARY_SYSTEM_PROMPT: &str = "Ты ведёшь краткое резюме диалога клиента со службой поддержки интернет-магазина. \
Дополни текущее резюме новыми репликами. Сохрани факты, вопросы и договорённости. \
Ответь только текстом обновлённого резюме.";

#[derive(Debug, Clone, Default)]
struct Conversation {
    messages: Vec<Message>,
    summary: String,
    /// Messages before this index are folded into `summary`
    summarized_upto: usize,
}

/// Thread-safe store of conversations keyed by id.
///
/// Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    conversations: Arc<RwLock<HashMap<String, Conversation>>>,
    max_history_messages: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_MESSAGES)
    }
}

fn speaker(role: &Role) -> &'static str {
    match role {
        Role::User => "Пользователь",
        Role::Assistant | Role::System => "Агент",
    }
}

fn render(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", speaker(m.role()), m.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ConversationMemory {
    /// Creates an empty store showing at most `max_history_messages` in
    /// prompts.
    pub fn new(max_history_messages: usize) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            max_history_messages: max_history_messages.max(1),
        }
    }

    pub fn max_history_messages(&self) -> usize {
        self.max_history_messages
    }

    /// Number of known conversations.
    pub fn len(&self) -> usize {
        self.conversations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.read().is_empty()
    }

    /// Appends a message to the conversation, creating it if needed.
    pub fn add_message(&self, conversation_id: &str, role: Role, content: impl Into<String>) {
        let mut conversations = self.conversations.write();
        let conversation = conversations
            .entry(conversation_id.to_string())
            .or_default();
        conversation.messages.push(Message::new(role, content));
        debug!(
            conversation_id = %conversation_id,
            role = %role,
            messages = conversation.messages.len(),
            "Message stored"
        );
    }

    /// Full message log, oldest first.
    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        self.conversations
            .read()
            .get(conversation_id)
            .map(|c| c.messages.clone())
            .unwrap_or_default()
    }

    /// Rolling summary of messages outside the window; empty until the first
    /// compaction.
    pub fn summary(&self, conversation_id: &str) -> String {
        self.conversations
            .read()
            .get(conversation_id)
            .map(|c| c.summary.clone())
            .unwrap_or_default()
    }

    /// Whether the conversation has no messages yet.
    pub fn is_first_message(&self, conversation_id: &str) -> bool {
        self.conversations
            .read()
            .get(conversation_id)
            .is_none_or(|c| c.messages.is_empty())
    }

    /// The most recent messages as `Пользователь: …` / `Агент: …` lines.
    pub fn format_history(&self, conversation_id: &str) -> String {
        let conversations = self.conversations.read();
        let messages = conversations
            .get(conversation_id)
            .map(|c| c.messages.as_slice())
            .unwrap_or_default();

        if messages.is_empty() {
            return EMPTY_HISTORY.to_string();
        }

        let start = messages.len().saturating_sub(self.max_history_messages);
        render(&messages[start..])
    }

    /// Folds messages that left the history window into the summary.
    ///
    /// Returns `true` if the summary was updated. The message log itself is
    /// never truncated. A failed summarisation keeps the previous summary.
    #[instrument(skip(self, driver), fields(provider = driver.provider_name()))]
    pub async fn compact<D: LlmDriver + ?Sized>(&self, conversation_id: &str, driver: &D) -> bool {
        let (previous, overflow, from, to) = {
            let conversations = self.conversations.read();
            let Some(conversation) = conversations.get(conversation_id) else {
                return false;
            };
            let to = conversation
                .messages
                .len()
                .saturating_sub(self.max_history_messages);
            let from = conversation.summarized_upto;
            if to <= from {
                return false;
            }
            (
                conversation.summary.clone(),
                render(&conversation.messages[from..to]),
                from,
                to,
            )
        };

        let previous_text = if previous.is_empty() {
            "(пусто)"
        } else {
            previous.as_str()
        };
        let request = GenerateRequest::new(vec![
            Message::system(SUMMARY_SYSTEM_PROMPT),
            Message::user(format!(
                "Текущее резюме:\n{}\n\nНовые реплики:\n{}",
                previous_text, overflow
            )),
        ])
        .with_temperature(0.0);

        let summary = match driver.generate(&request).await {
            Ok(response) if !response.text.trim().is_empty() => response.text.trim().to_string(),
            Ok(_) => {
                warn!("Summariser returned empty text, keeping previous summary");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Summarisation failed, keeping previous summary");
                return false;
            }
        };

        let mut conversations = self.conversations.write();
        let Some(conversation) = conversations.get_mut(conversation_id) else {
            return false;
        };
        if conversation.summarized_upto != from {
            debug!("Summary advanced concurrently, discarding this result");
            return false;
        }
        conversation.summary = summary;
        conversation.summarized_upto = to;
        info!(folded = to - from, summarized_upto = to, "Conversation summary updated");
        true
    }
}

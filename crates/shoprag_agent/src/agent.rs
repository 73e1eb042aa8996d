//! The support agent.

use crate::AnswerPrompt;
use derive_setters::Setters;
use parking_lot::Mutex;
use shoprag_core::{ChatResponse, ChunkInfo, Role};
use shoprag_error::ShopragResult;
use shoprag_interface::{LlmDriver, Retriever};
use shoprag_memory::ConversationMemory;
use shoprag_retrieval::{format_context, select_passages};
use shoprag_scenario::{ScenarioOutcome, ScenarioRunner};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Passage selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
#[setters(prefix = "with_")]
pub struct AgentConfig {
    /// Maximum passages used to ground one answer
    pub top_k: usize,
    /// Minimum retrieval score of a grounding passage
    pub min_score: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.5,
        }
    }
}

type TurnLocks = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// A conversation's entry in the turn-lock map.
///
/// Dropping the slot removes the entry once no other turn of the same
/// conversation holds it, including when the turn future is cancelled.
struct TurnSlot<'a> {
    locks: &'a TurnLocks,
    conversation_id: &'a str,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> TurnSlot<'a> {
    fn acquire(locks: &'a TurnLocks, conversation_id: &'a str) -> Self {
        let lock = Arc::clone(
            locks
                .lock()
                .entry(conversation_id.to_string())
                .or_default(),
        );
        Self {
            locks,
            conversation_id,
            lock,
        }
    }
}

impl Drop for TurnSlot<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        // Two owners left: the map and this slot.
        if locks
            .get(self.conversation_id)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2)
        {
            locks.remove(self.conversation_id);
        }
    }
}

/// Answers support chat messages.
///
/// Turns of one conversation run one at a time; turns of different
/// conversations run concurrently.
pub struct SupportAgent<D, R> {
    driver: D,
    retriever: R,
    memory: ConversationMemory,
    scenario: Option<ScenarioRunner<D>>,
    config: AgentConfig,
    turn_locks: TurnLocks,
}

impl<D: LlmDriver, R: Retriever> SupportAgent<D, R> {
    /// Creates an agent without a scenario.
    pub fn new(driver: D, retriever: R, memory: ConversationMemory) -> Self {
        Self {
            driver,
            retriever,
            memory,
            scenario: None,
            config: AgentConfig::default(),
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `runner` on the first message of every conversation.
    pub fn with_scenario(mut self, runner: ScenarioRunner<D>) -> Self {
        self.scenario = Some(runner);
        self
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn has_scenario(&self) -> bool {
        self.scenario.is_some()
    }

    /// Conversations with a turn in progress or waiting.
    pub fn active_turns(&self) -> usize {
        self.turn_locks.lock().len()
    }

    /// Handles one user message.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or answer generation fails. Scenario
    /// failures are logged and never returned.
    #[instrument(skip(self, message), fields(conversation_id = %conversation_id))]
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> ShopragResult<ChatResponse> {
        let slot = TurnSlot::acquire(&self.turn_locks, conversation_id);
        let _turn = slot.lock.lock().await;
        self.turn(conversation_id, message).await
    }

    async fn turn(&self, conversation_id: &str, message: &str) -> ShopragResult<ChatResponse> {
        let (scenario_context, last_step) = if self.memory.is_first_message(conversation_id) {
            self.run_scenario(message).await.into_parts()
        } else {
            Default::default()
        };

        self.memory.add_message(conversation_id, Role::User, message);

        let passages = self.retriever.retrieve(message).await?;
        let passages = select_passages(passages, self.config.min_score, self.config.top_k);
        info!(passages = passages.len(), "Selected grounding passages");

        let knowledge_context = format_context(&passages);
        let history = self.memory.format_history(conversation_id);
        let summary = self.memory.summary(conversation_id);
        let prompt = AnswerPrompt::new(
            &scenario_context,
            &knowledge_context,
            &summary,
            &history,
            message,
        );

        let response = self.driver.generate(&prompt.to_request()).await?;
        let answer = response.text;
        if let Some(usage) = response.usage {
            info!(total_tokens = usage.total_tokens, "Answer generated");
        }

        self.memory
            .add_message(conversation_id, Role::Assistant, answer.clone());
        self.memory.compact(conversation_id, &self.driver).await;

        Ok(ChatResponse {
            conversation_id: conversation_id.to_string(),
            answer,
            chunks: passages.iter().map(ChunkInfo::from).collect(),
            last_step_scenario: last_step,
        })
    }

    async fn run_scenario(&self, message: &str) -> ScenarioOutcome {
        let Some(runner) = &self.scenario else {
            return ScenarioOutcome::default();
        };

        info!("First message of conversation, running scenario");
        match runner.run(message).await {
            Ok(outcome) => {
                info!(last_step = %outcome.last_step(), "Scenario completed");
                outcome
            }
            Err(e) => {
                warn!(error = %e, "Scenario failed, continuing without scenario context");
                ScenarioOutcome::default()
            }
        }
    }
}

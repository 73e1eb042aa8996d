//! Component wiring and server startup.

use crate::{LlmSettings, ScenarioSettings, Settings, create_router};
use shoprag_agent::{AgentConfig, SupportAgent};
use shoprag_error::{ConfigError, HttpError, ShopragResult};
use shoprag_interface::LlmDriver;
use shoprag_memory::ConversationMemory;
use shoprag_models::{OpenAICompatConfig, OpenAICompatibleClient};
use shoprag_retrieval::{KeywordRetriever, KnowledgeBase};
use shoprag_scenario::{
    ConditionEvaluator, ScenarioInterpreter, ScenarioRunner, ScriptValidator, ToolRegistry,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The agent as deployed: OpenAI-compatible model, keyword retrieval.
pub type ShopragAgent = SupportAgent<Arc<OpenAICompatibleClient>, KeywordRetriever>;

/// Builds the shared language model client.
///
/// # Errors
///
/// Returns an error if the client configuration is incomplete or the HTTP
/// client cannot be created.
pub fn build_driver(settings: &LlmSettings) -> ShopragResult<Arc<OpenAICompatibleClient>> {
    let mut builder = OpenAICompatConfig::builder();
    builder
        .api_key(settings.api_key.clone())
        .model(settings.model.clone())
        .base_url(settings.api_base.clone())
        .provider_name("openrouter")
        .temperature(settings.temperature)
        .max_tokens(settings.max_tokens)
        .timeout(settings.timeout());
    let config = builder
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid LLM settings: {}", e)))?;

    Ok(Arc::new(OpenAICompatibleClient::new(config)?))
}

/// Loads the scenario script and pairs it with an interpreter.
///
/// Validation issues are logged, not fatal.
///
/// # Errors
///
/// Returns an error if the scenario file is missing or malformed.
#[instrument(skip_all, fields(path = %settings.file.display()))]
pub fn build_scenario_runner<D: LlmDriver>(
    settings: &ScenarioSettings,
    driver: D,
) -> ShopragResult<ScenarioRunner<D>> {
    let tools = ToolRegistry::with_defaults();
    let evaluator = ConditionEvaluator::new(driver)
        .with_affirmative_token(settings.affirmative_token.clone())
        .with_timeout(settings.condition_timeout());
    let runner = ScenarioRunner::from_file(&settings.file, ScenarioInterpreter::new(tools, evaluator))?;

    for issue in ScriptValidator::new(runner.interpreter().tools()).validate(runner.script()) {
        warn!(issue = %issue, "Scenario validation issue");
    }
    Ok(runner)
}

/// Builds the support agent from settings.
///
/// # Errors
///
/// Returns an error if the LLM client, the scenario or the knowledge base
/// cannot be set up. A missing knowledge-base file is not an error.
#[instrument(skip_all)]
pub fn build_agent(settings: &Settings) -> ShopragResult<ShopragAgent> {
    let driver = build_driver(&settings.llm)?;

    let knowledge_base = KnowledgeBase::load_or_empty(&settings.retrieval.knowledge_base_file)?;
    let retriever = KeywordRetriever::new(knowledge_base);

    let memory = ConversationMemory::new(settings.memory.max_history_messages);
    let config = AgentConfig::default()
        .with_top_k(settings.retrieval.top_k)
        .with_min_score(settings.retrieval.min_score);

    let mut agent = SupportAgent::new(Arc::clone(&driver), retriever, memory).with_config(config);
    if settings.scenario.enabled {
        agent = agent.with_scenario(build_scenario_runner(&settings.scenario, driver)?);
    } else {
        info!("Scenario disabled");
    }

    info!(
        model = %settings.llm.model,
        scenario = agent.has_scenario(),
        "Support agent ready"
    );
    Ok(agent)
}

/// Serves the chat API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the agent cannot be built or the listener cannot be
/// bound.
pub async fn serve(settings: Settings) -> ShopragResult<()> {
    let agent = Arc::new(build_agent(&settings)?);
    let router = create_router(agent);

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {}: {}", address, e)))?;
    info!(address = %address, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HttpError::new(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

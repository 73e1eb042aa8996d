//! Application settings.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. environment variables prefixed with `SHOPRAG__`, sections separated by
//!    `__` (e.g. `SHOPRAG__LLM__API_KEY`, `SHOPRAG__SERVER__PORT`)

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use shoprag_core::LogFormat;
use shoprag_error::{ConfigError, ShopragResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "SHOPRAG";

/// Language model connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API key for the OpenAI-compatible endpoint (required)
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Per-request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            api_base: default_api_base(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Knowledge base and passage selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default = "default_knowledge_base_file")]
    pub knowledge_base_file: PathBuf,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            knowledge_base_file: default_knowledge_base_file(),
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySettings {
    /// Messages shown to the model; older ones are summarised
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            max_history_messages: default_max_history_messages(),
        }
    }
}

/// First-contact scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_scenario_file")]
    pub file: PathBuf,
    /// Prefix of a "yes" answer from the condition classifier
    #[serde(default = "default_affirmative_token")]
    pub affirmative_token: String,
    #[serde(default = "default_condition_timeout")]
    pub condition_timeout_secs: u64,
}

impl ScenarioSettings {
    pub fn condition_timeout(&self) -> Duration {
        Duration::from_secs(self.condition_timeout_secs)
    }
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            file: default_scenario_file(),
            affirmative_token: default_affirmative_token(),
            condition_timeout_secs: default_condition_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// All application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub memory: MemorySettings,
    #[serde(default)]
    pub scenario: ScenarioSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Settings {
    /// Loads and validates settings from the process environment and an
    /// optional TOML file.
    ///
    /// A file passed explicitly must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result is invalid.
    pub fn load(path: Option<&Path>) -> ShopragResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading environment variables from `env`
    /// instead of the process when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result is invalid.
    #[tracing::instrument(skip(env))]
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> ShopragResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: Settings = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::new(format!("Failed to load settings: {}", e)))?;

        settings.validate()?;
        tracing::debug!(
            model = %settings.llm.model,
            scenario_enabled = settings.scenario.enabled,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Checks values that deserialisation alone cannot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> ShopragResult<()> {
        let fail = |message: &str| -> ShopragResult<()> { Err(ConfigError::new(message).into()) };

        if self.llm.api_key.trim().is_empty() {
            return fail("llm.api_key must be set (SHOPRAG__LLM__API_KEY)");
        }
        if self.llm.timeout_secs == 0 {
            return fail("llm.timeout_secs must be positive");
        }
        if self.retrieval.top_k == 0 {
            return fail("retrieval.top_k must be positive");
        }
        if !(0.0..=1.0).contains(&self.retrieval.min_score) {
            return fail("retrieval.min_score must be within [0, 1]");
        }
        if self.memory.max_history_messages == 0 {
            return fail("memory.max_history_messages must be positive");
        }
        if self.scenario.condition_timeout_secs == 0 {
            return fail("scenario.condition_timeout_secs must be positive");
        }
        if self.scenario.enabled && self.scenario.affirmative_token.trim().is_empty() {
            return fail("scenario.affirmative_token must not be empty");
        }
        Ok(())
    }
}

fn default_model() -> String {
    "openai/gpt-oss-20b:free".to_string()
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_knowledge_base_file() -> PathBuf {
    PathBuf::from("knowledge_base.json")
}

fn default_top_k() -> usize {
    5
}

fn default_min_score() -> f32 {
    0.5
}

fn default_max_history_messages() -> usize {
    20
}

fn default_enabled() -> bool {
    true
}

fn default_scenario_file() -> PathBuf {
    PathBuf::from("Scenario.json")
}

fn default_affirmative_token() -> String {
    "да".to_string()
}

fn default_condition_timeout() -> u64 {
    15
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

//! HTTP boundary of the OnlineShopRAG support backend.
//!
//! - [`Settings`]: layered configuration (defaults, TOML file, environment)
//! - [`create_router`]: `GET /health` and `POST /chat`
//! - [`build_agent`] / [`serve`]: wiring and server startup

mod api;
mod settings;
mod startup;

pub use api::{ApiError, AppState, create_router};
pub use settings::{
    ENV_PREFIX, LlmSettings, MemorySettings, RetrievalSettings, ScenarioSettings, ServerSettings,
    Settings,
};
pub use startup::{ShopragAgent, build_agent, build_driver, build_scenario_runner, serve};

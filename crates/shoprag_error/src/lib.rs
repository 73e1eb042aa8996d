//! Error types for the OnlineShopRAG support backend.
//!
//! Every error records the source location where it was created, so log lines
//! point straight at the failing call site. Crate-specific errors convert into
//! [`ShopragError`] through [`ShopragErrorKind`].

mod backend;
mod config;
mod http;
mod json;
mod retrieval;
mod scenario;

pub use backend::BackendError;
pub use config::ConfigError;
pub use http::HttpError;
pub use json::JsonError;
pub use retrieval::RetrievalError;
pub use scenario::{ScenarioError, ScenarioErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum ShopragErrorKind {
    /// HTTP error
    Http(HttpError),
    /// JSON serialization/deserialization error
    Json(JsonError),
    /// Generic backend (LLM provider, tool) error
    Backend(BackendError),
    /// Configuration error
    Config(ConfigError),
    /// Scenario loading or execution error
    Scenario(ScenarioError),
    /// Knowledge-base retrieval error
    Retrieval(RetrievalError),
}

impl std::fmt::Display for ShopragErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShopragErrorKind::Http(e) => write!(f, "{}", e),
            ShopragErrorKind::Json(e) => write!(f, "{}", e),
            ShopragErrorKind::Backend(e) => write!(f, "{}", e),
            ShopragErrorKind::Config(e) => write!(f, "{}", e),
            ShopragErrorKind::Scenario(e) => write!(f, "{}", e),
            ShopragErrorKind::Retrieval(e) => write!(f, "{}", e),
        }
    }
}

/// OnlineShopRAG error with kind discrimination.
#[derive(Debug)]
pub struct ShopragError(Box<ShopragErrorKind>);

impl ShopragError {
    /// Create a new error from a kind.
    pub fn new(kind: ShopragErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ShopragErrorKind {
        &self.0
    }
}

impl std::fmt::Display for ShopragError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OnlineShopRAG Error: {}", self.0)
    }
}

impl std::error::Error for ShopragError {}

// Generic From implementation for any type that converts to ShopragErrorKind
impl<T> From<T> for ShopragError
where
    T: Into<ShopragErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for OnlineShopRAG operations.
pub type ShopragResult<T> = std::result::Result<T, ShopragError>;

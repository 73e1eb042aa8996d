//! Configuration error types.

use derive_more::{Display, Error};

/// Invalid or unreadable settings, with the call site that rejected them.
#[derive(Debug, Clone, Display, Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What is wrong, naming the offending setting where possible
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Records `message` at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoprag_error::ConfigError;
    ///
    /// let err = ConfigError::new("retrieval.top_k must be positive");
    /// assert!(err.to_string().starts_with("Configuration Error: retrieval.top_k"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Backend error types.

use derive_more::{Display, Error};

/// The model provider or a scenario tool answered with an error or with
/// something unusable.
#[derive(Debug, Clone, Display, Error)]
#[display("Backend Error: {} at line {} in {}", message, line, file)]
pub struct BackendError {
    /// Provider or tool message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BackendError {
    /// Records `message` at the caller's location.
    ///
    /// ```
    /// use shoprag_error::BackendError;
    ///
    /// let err = BackendError::new("provider returned no choices");
    /// assert!(err.to_string().contains("no choices"));
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

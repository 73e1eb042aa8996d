//! Scenario error types.

use derive_more::{Display, Error};

/// Specific error conditions for scenario loading and execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum ScenarioErrorKind {
    /// Scenario file does not exist
    #[display("Scenario not found: {}", _0)]
    NotFound(String),
    /// Scenario file exists but could not be read
    #[display("Failed to read scenario file: {}", _0)]
    FileRead(String),
    /// Scenario document is not valid JSON or has the wrong shape
    #[display("Failed to parse scenario: {}", _0)]
    Parse(String),
    /// A tool invoked by a scenario node failed
    #[display("Tool '{}' failed: {}", tool, message)]
    ToolFailed {
        /// Tool name
        tool: String,
        /// Error message
        message: String,
    },
    /// Scenario failed validation
    #[display("Scenario validation failed: {}", _0)]
    Validation(String),
}

/// Error type for scenario operations.
///
/// # Examples
///
/// ```
/// use shoprag_error::{ScenarioError, ScenarioErrorKind};
///
/// let err = ScenarioError::new(ScenarioErrorKind::NotFound("Scenario.json".into()));
/// assert!(err.to_string().contains("Scenario.json"));
/// ```
#[derive(Debug, Clone, Display, Error)]
#[display("Scenario Error: {} at line {} in {}", kind, line, file)]
pub struct ScenarioError {
    /// The specific error condition
    pub kind: ScenarioErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScenarioError {
    /// Create a new ScenarioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScenarioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Scenario engine for the OnlineShopRAG support backend.
//!
//! A scenario is a short guided dialogue that runs on the first message of a
//! conversation. Its [`Script`] is a flat list of [`Node`]s: text fragments,
//! tool calls, LLM-evaluated `if` branches and an `end` marker. The
//! [`ScenarioInterpreter`] walks the script in document order and returns the
//! text it emitted together with the id of the last node it executed.
//!
//! # Example
//!
//! ```rust,ignore
//! use shoprag_scenario::{ConditionEvaluator, ScenarioInterpreter, Script, ToolRegistry};
//!
//! let script = Script::from_file("Scenario.json")?;
//! let interpreter = ScenarioInterpreter::new(
//!     ToolRegistry::with_defaults(),
//!     ConditionEvaluator::new(driver),
//! );
//! let outcome = interpreter.run(&script, "Где мой заказ?").await?;
//! println!("{} (last step: {})", outcome.context(), outcome.last_step());
//! ```

mod condition;
mod interpreter;
mod script;
mod substitution;
mod tools;
mod validator;

pub use condition::{
    CONDITION_SYSTEM_PROMPT, ConditionEvaluator, DEFAULT_AFFIRMATIVE_TOKEN,
    DEFAULT_CONDITION_TIMEOUT, is_affirmative,
};
pub use interpreter::{ExecutionState, ScenarioInterpreter, ScenarioOutcome, ScenarioRunner};
pub use script::{BranchNode, EndNode, IfNode, Node, Script, TextNode, ToolNode};
pub use substitution::substitute;
pub use tools::{GetUserData, Tool, ToolOutput, ToolRegistry, ToolResults};
pub use validator::{ScriptValidator, ValidationIssue, ValidationIssueKind};

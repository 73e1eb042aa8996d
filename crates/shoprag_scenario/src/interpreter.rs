//! Scenario interpreter.

use crate::{BranchNode, ConditionEvaluator, Node, Script, ToolRegistry, ToolResults, substitute};
use derive_getters::Getters;
use shoprag_error::ShopragResult;
use shoprag_interface::LlmDriver;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ScenarioOutcome {
    /// Emitted fragments joined with newlines
    context: String,
    /// Id of the last executed node, empty if none ran
    last_step: String,
}

impl ScenarioOutcome {
    pub fn new(context: impl Into<String>, last_step: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            last_step: last_step.into(),
        }
    }

    pub fn into_parts(self) -> (String, String) {
        (self.context, self.last_step)
    }
}

/// State threaded through a single run.
///
/// Each run starts from an empty state and owns it exclusively, so
/// concurrent runs never observe each other's tool results or text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ExecutionState {
    tool_results: ToolResults,
    fragments: Vec<String>,
    last_step: String,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn mark(&mut self, node_id: &str) {
        self.last_step.clear();
        self.last_step.push_str(node_id);
    }

    fn emit_text(&mut self, node_id: &str, template: &str) {
        let text = substitute(template, &self.tool_results);
        self.fragments.push(text);
        self.mark(node_id);
    }

    fn into_outcome(self) -> ScenarioOutcome {
        ScenarioOutcome {
            context: self.fragments.join("\n"),
            last_step: self.last_step,
        }
    }
}

/// Walks scenario scripts.
///
/// The interpreter holds only its collaborators; every run gets a fresh
/// [`ExecutionState`], so one interpreter can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct ScenarioInterpreter<D> {
    tools: ToolRegistry,
    evaluator: ConditionEvaluator<D>,
}

impl<D: LlmDriver> ScenarioInterpreter<D> {
    pub fn new(tools: ToolRegistry, evaluator: ConditionEvaluator<D>) -> Self {
        Self { tools, evaluator }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn evaluator(&self) -> &ConditionEvaluator<D> {
        &self.evaluator
    }

    /// Run `script` for the triggering user message.
    ///
    /// Nodes execute in document order until the script is exhausted or an
    /// `end` node is reached.
    ///
    /// # Errors
    ///
    /// Returns an error if a tool fails. Condition checks never fail.
    #[tracing::instrument(skip(self, script, user_message), fields(node_count = script.len()))]
    pub async fn run(&self, script: &Script, user_message: &str) -> ShopragResult<ScenarioOutcome> {
        info!("Starting scenario run");

        let mut state = ExecutionState::new();
        for node in script.nodes() {
            match self.dispatch(state, node, user_message).await? {
                ControlFlow::Continue(next) => state = next,
                ControlFlow::Break(done) => {
                    state = done;
                    break;
                }
            }
        }

        let outcome = state.into_outcome();
        info!(
            last_step = %outcome.last_step,
            context_len = outcome.context.chars().count(),
            "Scenario finished"
        );
        Ok(outcome)
    }

    async fn dispatch(
        &self,
        mut state: ExecutionState,
        node: &Node,
        user_message: &str,
    ) -> ShopragResult<ControlFlow<ExecutionState, ExecutionState>> {
        info!(node_id = %node.id(), kind = node.kind(), "Executing node");

        match node {
            Node::Text(text) => {
                state.emit_text(&text.id, &text.text);
            }
            Node::Tool(tool) => {
                if let Some(output) = self.tools.invoke(&tool.tool).await? {
                    state.tool_results.insert(tool.tool.clone(), output);
                }
                state.mark(&tool.id);
            }
            Node::If(branch) => {
                let met = self
                    .evaluator
                    .evaluate(&branch.condition, user_message)
                    .await;
                state.mark(&branch.id);
                info!(node_id = %branch.id, condition_met = met, "Condition evaluated");

                for child in branch.branch(met) {
                    match child {
                        BranchNode::Text(text) => state.emit_text(&text.id, &text.text),
                        BranchNode::Unsupported { id, kind } => {
                            debug!(node_id = %id, kind = %kind, "Skipping non-text branch child");
                        }
                    }
                }
            }
            Node::End(end) => {
                state.mark(&end.id);
                return Ok(ControlFlow::Break(state));
            }
        }

        Ok(ControlFlow::Continue(state))
    }
}

/// A script loaded once, paired with the interpreter that runs it.
#[derive(Debug, Clone)]
pub struct ScenarioRunner<D> {
    script: Arc<Script>,
    interpreter: ScenarioInterpreter<D>,
}

impl<D: LlmDriver> ScenarioRunner<D> {
    pub fn new(script: impl Into<Arc<Script>>, interpreter: ScenarioInterpreter<D>) -> Self {
        Self {
            script: script.into(),
            interpreter,
        }
    }

    /// Loads the script at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be loaded; see
    /// [`Script::from_file`].
    pub fn from_file(
        path: impl AsRef<Path>,
        interpreter: ScenarioInterpreter<D>,
    ) -> ShopragResult<Self> {
        Ok(Self::new(Script::from_file(path)?, interpreter))
    }

    pub fn script(&self) -> &Arc<Script> {
        &self.script
    }

    pub fn interpreter(&self) -> &ScenarioInterpreter<D> {
        &self.interpreter
    }

    /// Run the loaded script for a user message.
    ///
    /// # Errors
    ///
    /// See [`ScenarioInterpreter::run`].
    pub async fn run(&self, user_message: &str) -> ShopragResult<ScenarioOutcome> {
        self.interpreter.run(&self.script, user_message).await
    }
}

//! Static checks for scenario scripts.
//!
//! Validation never blocks loading: the interpreter runs any script that
//! parses. Issues point at scripts that will not behave as their author
//! probably intended.

use crate::{BranchNode, Node, Script, ToolRegistry};
use shoprag_error::{ScenarioError, ScenarioErrorKind, ShopragResult};
use std::collections::HashSet;

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationIssueKind {
    /// Two nodes share an id
    #[display("duplicate id")]
    DuplicateId,
    /// A `tool` node names a tool that is not registered
    #[display("unknown tool")]
    UnknownTool,
    /// A branch child that is not a text node; it will be skipped
    #[display("unsupported branch child")]
    UnsupportedBranchChild,
    /// An `if` node without condition text
    #[display("empty condition")]
    EmptyCondition,
    /// A node placed after an `end` node
    #[display("unreachable node")]
    Unreachable,
}

/// A problem found in a script.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{} ({}): {}", node_id, kind, message)]
pub struct ValidationIssue {
    pub kind: ValidationIssueKind,
    /// Id of the offending node
    pub node_id: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, node_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            node_id: node_id.to_string(),
            message: message.into(),
        }
    }
}

/// Checks scripts against a tool registry.
#[derive(Debug, Clone)]
pub struct ScriptValidator<'a> {
    tools: &'a ToolRegistry,
}

impl<'a> ScriptValidator<'a> {
    pub fn new(tools: &'a ToolRegistry) -> Self {
        Self { tools }
    }

    /// Collects every issue in `script`, in document order.
    pub fn validate(&self, script: &Script) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut end_seen: Option<&str> = None;

        let mut check_id = |id: &str, issues: &mut Vec<ValidationIssue>| {
            if !id.is_empty() && !seen.insert(id.to_string()) {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateId,
                    id,
                    "id is used by more than one node",
                ));
            }
        };

        for node in script.nodes() {
            check_id(node.id(), &mut issues);

            if let Some(end_id) = end_seen {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::Unreachable,
                    node.id(),
                    format!("node follows end node '{}' and never runs", end_id),
                ));
            }

            match node {
                Node::Tool(tool) if !self.tools.contains(&tool.tool) => {
                    issues.push(ValidationIssue::new(
                        ValidationIssueKind::UnknownTool,
                        &tool.id,
                        format!(
                            "tool '{}' is not registered (known: {})",
                            tool.tool,
                            self.tools.names().join(", ")
                        ),
                    ));
                }
                Node::If(branch) => {
                    if branch.condition.trim().is_empty() {
                        issues.push(ValidationIssue::new(
                            ValidationIssueKind::EmptyCondition,
                            &branch.id,
                            "condition text is empty",
                        ));
                    }

                    for child in branch.children.iter().chain(&branch.else_children) {
                        check_id(child.id(), &mut issues);
                        if let BranchNode::Unsupported { id, kind } = child {
                            issues.push(ValidationIssue::new(
                                ValidationIssueKind::UnsupportedBranchChild,
                                id,
                                format!(
                                    "branch children must be text nodes, '{}' node will be skipped",
                                    kind
                                ),
                            ));
                        }
                    }
                }
                Node::End(end) if end_seen.is_none() => end_seen = Some(end.id.as_str()),
                _ => {}
            }
        }

        issues
    }

    /// Like [`validate`](Self::validate), but any issue is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioErrorKind::Validation`] listing every issue found.
    pub fn ensure_valid(&self, script: &Script) -> ShopragResult<()> {
        let issues = self.validate(script);
        if issues.is_empty() {
            return Ok(());
        }

        let summary = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(ScenarioError::new(ScenarioErrorKind::Validation(format!(
            "{} issue(s): {}",
            issues.len(),
            summary
        )))
        .into())
    }
}

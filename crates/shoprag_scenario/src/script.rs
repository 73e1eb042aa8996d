//! Scenario script data model and loading.

use serde::Deserialize;
use shoprag_error::{ScenarioError, ScenarioErrorKind, ShopragResult};
use std::path::Path;
use std::str::FromStr;

/// Emits a text fragment, after variable substitution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_new::new)]
pub struct TextNode {
    #[serde(default)]
    #[new(into)]
    pub id: String,
    #[serde(default)]
    #[new(into)]
    pub text: String,
}

/// Invokes a registered tool and stores its output under the tool name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_new::new)]
pub struct ToolNode {
    #[serde(default)]
    #[new(into)]
    pub id: String,
    #[serde(default)]
    #[new(into)]
    pub tool: String,
}

/// Asks the condition evaluator about the user message and runs one branch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IfNode {
    #[serde(default)]
    pub id: String,
    /// Natural-language predicate about the user message
    #[serde(default)]
    pub condition: String,
    /// Branch taken when the condition holds
    #[serde(default)]
    pub children: Vec<BranchNode>,
    /// Branch taken otherwise
    #[serde(default)]
    pub else_children: Vec<BranchNode>,
}

impl IfNode {
    /// Creates an `if` node.
    pub fn new(
        id: impl Into<String>,
        condition: impl Into<String>,
        children: Vec<BranchNode>,
        else_children: Vec<BranchNode>,
    ) -> Self {
        Self {
            id: id.into(),
            condition: condition.into(),
            children,
            else_children,
        }
    }

    /// The branch selected by a condition outcome.
    pub fn branch(&self, condition_met: bool) -> &[BranchNode] {
        if condition_met {
            &self.children
        } else {
            &self.else_children
        }
    }
}

/// Stops the run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_new::new)]
pub struct EndNode {
    #[serde(default)]
    #[new(into)]
    pub id: String,
}

/// A top-level scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_more::From)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text(TextNode),
    Tool(ToolNode),
    If(IfNode),
    End(EndNode),
}

impl Node {
    /// Node identifier.
    pub fn id(&self) -> &str {
        match self {
            Node::Text(node) => &node.id,
            Node::Tool(node) => &node.id,
            Node::If(node) => &node.id,
            Node::End(node) => &node.id,
        }
    }

    /// Kind tag as written in scenario documents.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Tool(_) => "tool",
            Node::If(_) => "if",
            Node::End(_) => "end",
        }
    }
}

/// A child of an `if` branch.
///
/// Branches execute one level deep and only text children run. Any other
/// kind, including a nested `if`, is kept as [`BranchNode::Unsupported`] so
/// validation can report it; the interpreter skips it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBranchNode")]
pub enum BranchNode {
    Text(TextNode),
    Unsupported { id: String, kind: String },
}

impl BranchNode {
    /// Node identifier.
    pub fn id(&self) -> &str {
        match self {
            BranchNode::Text(node) => &node.id,
            BranchNode::Unsupported { id, .. } => id,
        }
    }
}

impl From<TextNode> for BranchNode {
    fn from(node: TextNode) -> Self {
        BranchNode::Text(node)
    }
}

#[derive(Deserialize)]
struct RawBranchNode {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl From<RawBranchNode> for BranchNode {
    fn from(raw: RawBranchNode) -> Self {
        if raw.kind == "text" {
            BranchNode::Text(TextNode {
                id: raw.id,
                text: raw.text,
            })
        } else {
            BranchNode::Unsupported {
                id: raw.id,
                kind: raw.kind,
            }
        }
    }
}

/// An immutable scenario script.
///
/// Scenario documents are JSON objects whose `code` array holds the
/// top-level nodes:
///
/// ```json
/// {"code": [
///   {"id": "greet", "type": "text", "text": "Здравствуйте"},
///   {"id": "stop", "type": "end"}
/// ]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    #[serde(rename = "code", default)]
    nodes: Vec<Node>,
}

impl Script {
    /// Creates a script from top-level nodes.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Loads a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioErrorKind::NotFound`] if the file does not exist,
    /// [`ScenarioErrorKind::FileRead`] if it cannot be read and
    /// [`ScenarioErrorKind::Parse`] if it is not a valid scenario document.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ShopragResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(
                ScenarioError::new(ScenarioErrorKind::NotFound(path.display().to_string())).into(),
            );
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScenarioError::new(ScenarioErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let script: Script = content.parse()?;
        tracing::info!(node_count = script.len(), "Loaded scenario");
        Ok(script)
    }
}

impl FromStr for Script {
    type Err = shoprag_error::ShopragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map_err(|e| ScenarioError::new(ScenarioErrorKind::Parse(e.to_string())).into())
    }
}

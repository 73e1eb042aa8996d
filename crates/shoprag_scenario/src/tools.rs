//! Tools callable from scenario `tool` nodes.
//!
//! A tool is a named, argument-free data provider. Its output is a flat
//! field map that later `text` nodes read through `{=@tool.field=}`
//! placeholders.

use async_trait::async_trait;
use shoprag_error::{ScenarioError, ScenarioErrorKind, ShopragResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Field map returned by a tool.
pub type ToolOutput = BTreeMap<String, String>;

/// Outputs collected during one run, keyed by tool name.
pub type ToolResults = HashMap<String, ToolOutput>;

/// A named data provider.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use shoprag_error::{ScenarioError, ScenarioErrorKind, ShopragResult};
/// use shoprag_scenario::{Tool, ToolOutput};
///
/// struct OrderStatus;
///
/// #[async_trait]
/// impl Tool for OrderStatus {
///     fn name(&self) -> &str {
///         "get_order_status"
///     }
///
///     async fn invoke(&self) -> ShopragResult<ToolOutput> {
///         Ok(ToolOutput::from([("status".into(), "в пути".into())]))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used by `tool` nodes and placeholders.
    fn name(&self) -> &str;

    /// Produce the tool's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data source fails. The error
    /// aborts the scenario run.
    async fn invoke(&self) -> ShopragResult<ToolOutput>;
}

/// Stub user profile lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetUserData;

#[async_trait]
impl Tool for GetUserData {
    fn name(&self) -> &str {
        "get_user_data"
    }

    async fn invoke(&self) -> ShopragResult<ToolOutput> {
        Ok(ToolOutput::from([
            ("name".to_string(), "Антон".to_string()),
            ("age".to_string(), "25".to_string()),
        ]))
    }
}

/// Name-to-tool mapping consulted by the interpreter.
///
/// Cloning is cheap; clones share the registered tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tools (`get_user_data`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GetUserData));
        registry
    }

    /// Register a tool under its own name, replacing any previous tool with
    /// that name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "Replaced registered tool");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name.
    ///
    /// Returns `Ok(None)` for an unknown name.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioErrorKind::ToolFailed`] if the tool itself fails.
    #[tracing::instrument(skip(self), fields(tool = %name))]
    pub async fn invoke(&self, name: &str) -> ShopragResult<Option<ToolOutput>> {
        let Some(tool) = self.tools.get(name) else {
            tracing::debug!("Unknown tool, nothing stored");
            return Ok(None);
        };

        let output = tool.invoke().await.map_err(|e| {
            ScenarioError::new(ScenarioErrorKind::ToolFailed {
                tool: name.to_string(),
                message: e.to_string(),
            })
        })?;
        tracing::debug!(fields = output.len(), "Tool returned");
        Ok(Some(output))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

//! Tool catalog and the per-run name index.

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::Tool;
use crate::types::ToolDefinition;

/// Ordered catalog of available tools.
///
/// Registration order is the order definitions are advertised to the backend.
#[derive(Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool of the same name in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(pos) => Some(std::mem::replace(&mut self.tools[pos], tool)),
            None => {
                self.tools.push(tool);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        let pos = self.tools.iter().position(|t| t.name() == name)?;
        Some(self.tools.remove(pos))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Name-indexed view, built once per execution call.
    pub fn index(&self) -> ToolIndex {
        ToolIndex {
            tools: self
                .tools
                .iter()
                .map(|t| (t.name().to_string(), Arc::clone(t)))
                .collect(),
        }
    }
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tools", &self.names())
            .finish()
    }
}

/// Snapshot of the catalog keyed by exact tool name.
#[derive(Clone, Default)]
pub struct ToolIndex {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolIndex {
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

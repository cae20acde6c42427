//! SubagentTool - lets the backend delegate a prompt to a registered subagent.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::SubagentRegistry;
use crate::agent::RunOptions;
use crate::common::Named;
use crate::tools::{SchemaTool, ToolContext};
use crate::types::{Message, ToolError};

pub struct SubagentTool {
    registry: Arc<SubagentRegistry>,
    description: String,
    parent_link: bool,
}

impl SubagentTool {
    pub fn new(registry: SubagentRegistry) -> Self {
        let agents = registry
            .list()
            .into_iter()
            .filter_map(|name| registry.get(name))
            .map(|s| format!("- {}: {}", s.name(), s.description().unwrap_or("no description")))
            .collect::<Vec<_>>();

        let description = if agents.is_empty() {
            Self::DESCRIPTION.to_string()
        } else {
            format!("{}\n\nAvailable agents:\n{}", Self::DESCRIPTION, agents.join("\n"))
        };

        Self {
            registry: Arc::new(registry),
            description,
            parent_link: false,
        }
    }

    /// Run child delegations under `context.run().child()` instead of a fresh
    /// unrelated run id.
    pub fn with_parent_link(mut self, enabled: bool) -> Self {
        self.parent_link = enabled;
        self
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SubagentInput {
    /// Name of the subagent to run
    pub agent: String,
    /// The task prompt for the subagent
    pub prompt: String,
}

#[async_trait]
impl SchemaTool for SubagentTool {
    type Input = SubagentInput;

    const NAME: &'static str = "delegate";
    const DESCRIPTION: &'static str =
        "Delegate a self-contained task to a specialized agent and return its final answer.";

    fn custom_description(&self) -> Option<&str> {
        Some(&self.description)
    }

    async fn handle(
        &self,
        input: SubagentInput,
        context: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let mut options =
            RunOptions::new().with_cancellation(context.cancellation().child_token());
        if self.parent_link {
            options = options.with_context(context.run().child());
        }

        let delegation = self
            .registry
            .delegate_with(&input.agent, vec![Message::user(input.prompt)], options)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        match delegation.result {
            Ok(result) => Ok(serde_json::Value::String(result.text)),
            Err(e) => Err(ToolError::execution_failed(format!(
                "subagent '{}' failed: {}",
                delegation.name, e
            ))),
        }
    }
}

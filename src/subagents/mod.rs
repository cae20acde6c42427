//! Independently configured agents that can be delegated to by name.
//!
//! Delegation is one-shot: the subagent starts from its own system prompt and
//! the transcript it is given, and its full [`AgentResult`] is returned.

mod registry;
mod subagent_tool;

pub use registry::SubagentRegistry;
pub use subagent_tool::{SubagentInput, SubagentTool};

use std::sync::Arc;

use crate::agent::{Agent, AgentResult};
use crate::common::Named;
use crate::types::Message;

/// Registered subagent entry.
#[derive(Debug, Clone)]
pub struct Subagent {
    name: String,
    description: Option<String>,
    agent: Arc<Agent>,
}

impl Subagent {
    pub fn new(name: impl Into<String>, agent: impl Into<Arc<Agent>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            agent: agent.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }
}

impl Named for Subagent {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of one delegation. Not a live handle.
#[derive(Debug)]
pub struct SubagentDelegation {
    pub name: String,
    /// Transcript the subagent was started with
    pub messages: Vec<Message>,
    pub result: crate::Result<AgentResult>,
}

impl SubagentDelegation {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Final text of a successful delegation.
    pub fn text(&self) -> Option<&str> {
        self.result.as_ref().ok().map(AgentResult::text)
    }
}

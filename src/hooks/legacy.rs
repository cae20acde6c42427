//! Simple single-hook callbacks kept for older integrations.
//!
//! Each hook is independent and fires on its own, alongside the structured
//! [`Callbacks`](super::Callbacks). These are engine-level only and never merged.

use std::sync::Arc;

use super::callbacks::Listener;
use super::events::{RunErrorEvent, StepStartEvent};
use crate::agent::{AgentAction, AgentFinish, StepResult};
use crate::types::{ToolCall, ToolResult};

#[derive(Clone, Default)]
pub struct LegacyHooks {
    pub(crate) llm_start: Option<Listener<StepStartEvent>>,
    pub(crate) llm_end: Option<Listener<StepResult>>,
    pub(crate) tool_start: Option<Listener<ToolCall>>,
    pub(crate) tool_end: Option<Listener<ToolResult>>,
    pub(crate) tool_error: Option<Listener<ToolResult>>,
    pub(crate) agent_action: Option<Listener<AgentAction>>,
    pub(crate) agent_finish: Option<Listener<AgentFinish>>,
    pub(crate) chain_error: Option<Listener<RunErrorEvent>>,
}

impl LegacyHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_llm_start(mut self, f: impl Fn(&StepStartEvent) + Send + Sync + 'static) -> Self {
        self.llm_start = Some(Arc::new(f));
        self
    }

    pub fn on_llm_end(mut self, f: impl Fn(&StepResult) + Send + Sync + 'static) -> Self {
        self.llm_end = Some(Arc::new(f));
        self
    }

    pub fn on_tool_start(mut self, f: impl Fn(&ToolCall) + Send + Sync + 'static) -> Self {
        self.tool_start = Some(Arc::new(f));
        self
    }

    /// Fires for successful and deferred tool results.
    pub fn on_tool_end(mut self, f: impl Fn(&ToolResult) + Send + Sync + 'static) -> Self {
        self.tool_end = Some(Arc::new(f));
        self
    }

    pub fn on_tool_error(mut self, f: impl Fn(&ToolResult) + Send + Sync + 'static) -> Self {
        self.tool_error = Some(Arc::new(f));
        self
    }

    pub fn on_agent_action(mut self, f: impl Fn(&AgentAction) + Send + Sync + 'static) -> Self {
        self.agent_action = Some(Arc::new(f));
        self
    }

    pub fn on_agent_finish(mut self, f: impl Fn(&AgentFinish) + Send + Sync + 'static) -> Self {
        self.agent_finish = Some(Arc::new(f));
        self
    }

    pub fn on_chain_error(mut self, f: impl Fn(&RunErrorEvent) + Send + Sync + 'static) -> Self {
        self.chain_error = Some(Arc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.llm_start.is_none()
            && self.llm_end.is_none()
            && self.tool_start.is_none()
            && self.tool_end.is_none()
            && self.tool_error.is_none()
            && self.agent_action.is_none()
            && self.agent_finish.is_none()
            && self.chain_error.is_none()
    }
}

impl std::fmt::Debug for LegacyHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyHooks")
            .field("llm_start", &self.llm_start.is_some())
            .field("llm_end", &self.llm_end.is_some())
            .field("tool_start", &self.tool_start.is_some())
            .field("tool_end", &self.tool_end.is_some())
            .field("tool_error", &self.tool_error.is_some())
            .field("agent_action", &self.agent_action.is_some())
            .field("agent_finish", &self.agent_finish.is_some())
            .field("chain_error", &self.chain_error.is_some())
            .finish()
    }
}

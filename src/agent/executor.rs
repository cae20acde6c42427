//! Agent core structure.

use std::sync::Arc;

use super::config::AgentConfig;
use super::step::PrepareStep;
use super::stop::StopConditions;
use crate::backend::Backend;
use crate::hooks::{Callbacks, LegacyHooks};
use crate::skills::SkillRegistry;
use crate::subagents::SubagentRegistry;
use crate::tools::{ApprovalPolicy, Tool, ToolCatalog};

/// A configured engine instance.
///
/// Execution takes `&self`, so one `Arc<Agent>` may serve concurrent runs.
/// Catalog and registry edits take `&mut self`.
pub struct Agent {
    pub(crate) config: AgentConfig,
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) tools: ToolCatalog,
    pub(crate) skills: SkillRegistry,
    pub(crate) subagents: SubagentRegistry,
    pub(crate) stop_conditions: StopConditions,
    /// Hard step ceiling after normalization
    pub(crate) max_steps: usize,
    pub(crate) approval: ApprovalPolicy,
    pub(crate) callbacks: Option<Callbacks>,
    pub(crate) legacy_hooks: LegacyHooks,
    pub(crate) prepare_step: Option<Arc<dyn PrepareStep>>,
}

impl Agent {
    #[must_use]
    pub fn builder() -> super::AgentBuilder {
        super::AgentBuilder::new()
    }

    /// Register or replace a tool by name.
    pub fn add_tool(&mut self, tool: impl Tool + 'static) -> Option<Arc<dyn Tool>> {
        self.tools.register(Arc::new(tool))
    }

    pub fn add_shared_tool(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        self.tools.register(tool)
    }

    pub fn remove_tool(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    #[must_use]
    pub fn tools(&self) -> &ToolCatalog {
        &self.tools
    }

    #[must_use]
    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillRegistry {
        &mut self.skills
    }

    #[must_use]
    pub fn subagents(&self) -> &SubagentRegistry {
        &self.subagents
    }

    pub fn subagents_mut(&mut self) -> &mut SubagentRegistry {
        &mut self.subagents
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    #[must_use]
    pub fn stop_conditions(&self) -> &StopConditions {
        &self.stop_conditions
    }

    /// Step ceiling enforced regardless of stop conditions.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    #[must_use]
    pub fn approval(&self) -> &ApprovalPolicy {
        &self.approval
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("tools", &self.tools)
            .field("skills", &self.skills.list())
            .field("subagents", &self.subagents.list())
            .field("stop_conditions", &self.stop_conditions)
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

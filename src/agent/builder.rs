//! AgentBuilder struct and configuration methods.

use std::sync::Arc;
use std::time::Duration;

use super::config::{AgentConfig, ExecutionConfig, SamplingConfig, TimeoutConfig};
use super::executor::Agent;
use super::step::PrepareStep;
use super::stop::{StopCondition, StopConditions};
use crate::backend::Backend;
use crate::hooks::{Callbacks, LegacyHooks};
use crate::skills::{Skill, SkillRegistry};
use crate::subagents::{Subagent, SubagentRegistry};
use crate::tools::{ApprovalPolicy, Tool, ToolCatalog};
use crate::types::ToolCall;
use crate::{Error, Result};

#[derive(Default)]
pub struct AgentBuilder {
    config: AgentConfig,
    backend: Option<Arc<dyn Backend>>,
    tools: Vec<Arc<dyn Tool>>,
    skills: Vec<Skill>,
    subagents: Vec<Subagent>,
    stop_conditions: Vec<Arc<dyn StopCondition>>,
    approval: ApprovalPolicy,
    callbacks: Option<Callbacks>,
    legacy_hooks: LegacyHooks,
    prepare_step: Option<Arc<dyn PrepareStep>>,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    // Execution

    pub fn execution(mut self, config: ExecutionConfig) -> Self {
        self.config.execution = config;
        self
    }

    pub fn max_steps(mut self, max: usize) -> Self {
        self.config.execution.max_steps = Some(max);
        self
    }

    pub fn streaming(mut self, enabled: bool) -> Self {
        self.config.execution.streaming = enabled;
        self
    }

    // Timeouts

    pub fn timeouts(mut self, config: TimeoutConfig) -> Self {
        self.config.timeouts = config;
        self
    }

    pub fn run_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.run = Some(timeout);
        self
    }

    pub fn step_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.step = Some(timeout);
        self
    }

    pub fn chunk_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.chunk = Some(timeout);
        self
    }

    // Sampling

    pub fn sampling(mut self, config: SamplingConfig) -> Self {
        self.config.sampling = config;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.sampling = self.config.sampling.with_temperature(temperature);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.sampling.max_tokens = Some(tokens);
        self
    }

    // Tools

    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn shared_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn approval(mut self, policy: ApprovalPolicy) -> Self {
        self.approval = policy;
        self
    }

    pub fn require_approval(
        self,
        predicate: impl Fn(&ToolCall) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.approval(ApprovalPolicy::require_fn(predicate))
    }

    // Skills & subagents

    pub fn skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn subagent(mut self, name: impl Into<String>, agent: impl Into<Arc<Agent>>) -> Self {
        self.subagents.push(Subagent::new(name, agent));
        self
    }

    pub fn subagent_entry(mut self, subagent: Subagent) -> Self {
        self.subagents.push(subagent);
        self
    }

    // Stop conditions

    pub fn stop_when(mut self, condition: Arc<dyn StopCondition>) -> Self {
        self.stop_conditions.push(condition);
        self
    }

    pub fn stop_conditions(
        mut self,
        conditions: impl IntoIterator<Item = Arc<dyn StopCondition>>,
    ) -> Self {
        self.stop_conditions.extend(conditions);
        self
    }

    // Hooks

    pub fn callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn legacy_hooks(mut self, hooks: LegacyHooks) -> Self {
        self.legacy_hooks = hooks;
        self
    }

    pub fn prepare_step(mut self, hook: impl PrepareStep + 'static) -> Self {
        self.prepare_step = Some(Arc::new(hook));
        self
    }

    /// Validate and normalize. No step runs before this succeeds.
    pub fn build(self) -> Result<Agent> {
        let backend = self
            .backend
            .ok_or_else(|| Error::Config("a backend is required".into()))?;

        if !self.approval.is_consistent() {
            return Err(Error::Config(
                "tool approval is required but no approver is configured".into(),
            ));
        }

        let mut tools = ToolCatalog::new();
        for tool in self.tools {
            if tool.name().is_empty() {
                return Err(Error::Config("tool name must not be empty".into()));
            }
            tools.register(tool);
        }

        let mut skills = SkillRegistry::new();
        for skill in self.skills {
            skills.register(skill)?;
        }

        let mut subagents = SubagentRegistry::new();
        for subagent in self.subagents {
            subagents.register(subagent)?;
        }

        let (stop_conditions, max_steps) = StopConditions::from(self.stop_conditions)
            .normalize(self.config.execution.max_steps);

        tracing::debug!(
            backend = backend.name(),
            tools = tools.len(),
            stop_conditions = stop_conditions.len(),
            max_steps,
            "Agent built"
        );

        Ok(Agent {
            config: self.config,
            backend,
            tools,
            skills,
            subagents,
            stop_conditions,
            max_steps,
            approval: self.approval,
            callbacks: self.callbacks,
            legacy_hooks: self.legacy_hooks,
            prepare_step: self.prepare_step,
        })
    }
}

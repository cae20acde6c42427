//! Agent execution engine.

mod builder;
mod config;
mod events;
mod execution;
mod executor;
mod run_context;
mod state;
mod step;
mod stop;

#[cfg(test)]
mod tests;

pub use builder::AgentBuilder;
pub use config::{AgentConfig, ExecutionConfig, SamplingConfig, TimeoutConfig};
pub use events::{AgentAction, AgentFinish, AgentResult, StepResult};
pub use execution::RunOptions;
pub use executor::Agent;
pub use run_context::RunContext;
pub use state::{AgentMetrics, ToolStats};
pub use step::{CallPreparation, PrepareStep};
pub use stop::{
    FnCondition, HasToolCall, MAX_STEPS_REASON, SAFETY_MAX_STEPS, StepCountIs, StopCondition,
    StopConditions, StopHit, StopState, TextContains, TokenBudget, step_count_is,
};

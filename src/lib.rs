//! # agent-engine
//!
//! Drives a multi-step, tool-augmented exchange with a text-generation backend
//! until a stop condition is satisfied.
//!
//! Each step sends the transcript to a [`Backend`], dispatches any tool calls the
//! response requests, and appends the results before the next step. Stop
//! conditions, approval gating, structured callbacks, skills and subagents are
//! configured on the [`AgentBuilder`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agent_engine::{Agent, Backend, FunctionTool, step_count_is};
//!
//! # async fn example(backend: Arc<dyn Backend>) -> Result<(), agent_engine::Error> {
//! let agent = Agent::builder()
//!     .backend(backend)
//!     .system_prompt("You are a careful calculator.")
//!     .tool(FunctionTool::new(
//!         "add",
//!         "Add two integers",
//!         serde_json::json!({"type": "object"}),
//!         |input, _ctx| async move {
//!             let a = input["a"].as_i64().unwrap_or_default();
//!             let b = input["b"].as_i64().unwrap_or_default();
//!             Ok(serde_json::json!(a + b))
//!         },
//!     ))
//!     .stop_when(step_count_is(5))
//!     .build()?;
//!
//! let result = agent.execute("What is 2 + 40?").await?;
//! println!("{} ({} steps)", result.text(), result.step_count());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent;
pub mod backend;
pub mod common;
pub mod config;
pub mod hooks;
pub mod prelude;
pub mod skills;
pub mod subagents;
pub mod tools;
pub mod types;

pub use agent::{
    Agent, AgentAction, AgentBuilder, AgentConfig, AgentFinish, AgentMetrics, AgentResult,
    CallPreparation, ExecutionConfig, FnCondition, HasToolCall, MAX_STEPS_REASON, PrepareStep,
    RunContext, RunOptions, SAFETY_MAX_STEPS, SamplingConfig, StepCountIs, StepResult,
    StopCondition, StopConditions, StopHit, StopState, TextContains, TimeoutConfig, TokenBudget,
    ToolStats, step_count_is,
};
pub use backend::{Backend, BackendResponse, ChunkStream, ResponseAccumulator, StreamChunk};
pub use common::{Named, NamedRegistry, RegistryError};
pub use config::{ConfigError, EngineSettings};
pub use hooks::{AgentEvent, Callbacks, EventKind, LegacyHooks};
pub use skills::{Skill, SkillRegistry, SkillTool};
pub use subagents::{SubagentDelegation, SubagentRegistry, SubagentTool};
pub use tools::{
    ApprovalDecision, ApprovalPolicy, DeferredTool, FunctionTool, SchemaTool, Tool, ToolApprover,
    ToolCatalog, ToolContext, ToolExecution,
};
pub use types::{
    ContentBlock, FinishReason, Message, Role, ToolCall, ToolDefinition, ToolError, ToolOutput,
    ToolResult, Usage,
};

/// Error type for engine operations.
///
/// Tool failures never surface here; they are recorded as error
/// [`ToolResult`]s and the run continues.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation backend failed.
    #[error("Backend error: {message}")]
    Backend { message: String, retryable: bool },

    /// A step failed; wraps the underlying cause with its step number.
    #[error("Step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: Box<Error>,
    },

    /// Operation exceeded timeout.
    #[error("Operation timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(std::time::Duration),

    /// The caller cancelled the run.
    #[error("Execution cancelled")]
    Cancelled,

    /// Skill or subagent registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A skill handler returned an error.
    #[error("Skill '{name}' failed: {message}")]
    Skill { name: String, message: String },

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration, parsing, or setup errors
    Configuration,
    /// Backend errors that may succeed on retry
    Transient,
    /// Registry lookups and other stateful operation errors
    Stateful,
    /// Internal errors (IO, JSON, failing handlers)
    Internal,
    /// Timeouts and cancellation
    ResourceLimit,
}

impl Error {
    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn retryable_backend(message: impl Into<String>) -> Self {
        Error::Backend {
            message: message.into(),
            retryable: true,
        }
    }

    pub(crate) fn at_step(self, step: usize) -> Self {
        match self {
            Error::Step { .. } | Error::Cancelled => self,
            other => Error::Step {
                step,
                source: Box::new(other),
            },
        }
    }

    /// Innermost error, looking through step wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// Step number the failure occurred in, if step-scoped.
    pub fn step(&self) -> Option<usize> {
        match self {
            Error::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            Error::Config(_) => ErrorCategory::Configuration,
            Error::Backend {
                retryable: true, ..
            } => ErrorCategory::Transient,
            Error::Registry(_) => ErrorCategory::Stateful,
            Error::Timeout(_) | Error::Cancelled => ErrorCategory::ResourceLimit,
            Error::Backend { .. }
            | Error::Skill { .. }
            | Error::Json(_)
            | Error::Io(_)
            | Error::Step { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_resource_limit(&self) -> bool {
        self.category() == ErrorCategory::ResourceLimit
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            ConfigError::Serialization(e) => Error::Json(e),
            ConfigError::Io(e) => Error::Io(e),
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

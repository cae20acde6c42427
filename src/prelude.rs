//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for building and running agents.
//!
//! # Usage
//!
//! ```rust
//! use agent_engine::prelude::*;
//! ```

// Core types
pub use crate::Agent;
pub use crate::AgentBuilder;
pub use crate::AgentResult;
pub use crate::Error;
pub use crate::Result;
pub use crate::RunContext;
pub use crate::RunOptions;
pub use crate::StepResult;

// Backend
pub use crate::backend::{Backend, BackendResponse, StreamChunk};

// Stop conditions
pub use crate::agent::{StopCondition, TokenBudget, step_count_is};

// Common
pub use crate::common::Named;

// Tools
pub use crate::tools::{ApprovalPolicy, FunctionTool, SchemaTool, Tool, ToolContext};
pub use crate::types::ToolResult;

// Types
pub use crate::types::{ContentBlock, FinishReason, Message, Role, ToolCall, Usage};

// Skills & subagents
pub use crate::skills::{Skill, SkillRegistry};
pub use crate::subagents::SubagentRegistry;

// Hooks
pub use crate::hooks::{Callbacks, LegacyHooks};

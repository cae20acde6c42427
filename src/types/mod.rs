//! Core value types for the agent engine.

mod message;
mod response;
mod tool;

pub use message::{ContentBlock, Message, Role};
pub use response::{FinishReason, Usage};
pub use tool::{ToolCall, ToolDefinition, ToolError, ToolOutput, ToolResult};

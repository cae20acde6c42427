//! Tool call, result and definition types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ContentBlock;

/// A tool invocation requested by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Tool definition advertised to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    /// Set for tools the backend executes itself.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deferred: bool,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            deferred: false,
        }
    }

    pub fn with_deferred(mut self, deferred: bool) -> Self {
        self.deferred = deferred;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("tool not found: {name}")]
    NotFound { name: String },

    #[error("tool call rejected: {name}{}", reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    Rejected { name: String, reason: Option<String> },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("execution failed: {message}")]
    ExecutionFailed { message: String },
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn rejected(name: impl Into<String>, reason: Option<String>) -> Self {
        Self::Rejected {
            name: name.into(),
            reason,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Value(serde_json::Value),
    Error(ToolError),
    /// Backend-deferred; the value arrives on a later backend turn.
    Pending,
}

impl ToolOutput {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Text form re-injected into the transcript. Strings are passed through raw.
    pub fn text(&self) -> String {
        match self {
            Self::Value(serde_json::Value::String(s)) => s.clone(),
            Self::Value(value) => value.to_string(),
            Self::Error(e) => e.to_string(),
            Self::Pending => String::new(),
        }
    }
}

/// Outcome of a single tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub output: ToolOutput,
    pub deferred: bool,
    pub duration_ms: u64,
}

impl ToolResult {
    pub fn success(call: &ToolCall, value: serde_json::Value, duration_ms: u64) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            output: ToolOutput::Value(value),
            deferred: false,
            duration_ms,
        }
    }

    pub fn error(call: &ToolCall, error: ToolError, duration_ms: u64) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            output: ToolOutput::Error(error),
            deferred: false,
            duration_ms,
        }
    }

    pub fn deferred(call: &ToolCall) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            output: ToolOutput::Pending,
            deferred: true,
            duration_ms: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.output.is_error()
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match &self.output {
            ToolOutput::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.output {
            ToolOutput::Error(e) => Some(e.to_string()),
            _ => None,
        }
    }

    /// Transcript block for this result, `None` for deferred placeholders.
    pub fn to_content_block(&self) -> Option<ContentBlock> {
        if self.deferred {
            return None;
        }
        Some(ContentBlock::ToolResult {
            tool_use_id: self.tool_call_id.clone(),
            content: self.output.text(),
            is_error: self.is_error(),
        })
    }
}

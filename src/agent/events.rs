//! Step and run result types.

use chrono::{DateTime, Utc};

use super::run_context::RunContext;
use super::state::AgentMetrics;
use crate::types::{FinishReason, Message, ToolCall, ToolResult, Usage};

/// Outcome of one request/response cycle plus its tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// 1-based step number
    pub index: usize,
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    /// One entry per tool call, same order
    pub tool_results: Vec<ToolResult>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    pub warnings: Vec<String>,
    /// Assistant message reconstructed from the response
    pub message: Message,
    /// Time spent in the backend call
    pub duration_ms: u64,
}

impl StepResult {
    /// Whether the loop may proceed past this step.
    pub fn is_continuable(&self) -> bool {
        self.finish_reason == FinishReason::ToolCalls && !self.tool_calls.is_empty()
    }
}

/// Result of agent execution.
#[derive(Debug, Clone)]
pub struct AgentResult {
    /// Text of all steps, concatenated in order
    pub text: String,
    pub steps: Vec<StepResult>,
    pub tool_results: Vec<ToolResult>,
    pub usage: Usage,
    pub warnings: Vec<String>,
    /// Stop-condition reason, or the final finish reason when the backend ended the run
    pub stop_reason: String,
    pub finish_reason: FinishReason,
    pub run: RunContext,
    /// Transcript including every assistant turn and tool result
    pub messages: Vec<Message>,
    pub metrics: AgentMetrics,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AgentResult {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.usage.total()
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn last_step(&self) -> Option<&StepResult> {
        self.steps.last()
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        self.run.run_id()
    }
}

/// Decision-level view of a step that requested a tool. Notification only.
#[derive(Debug, Clone)]
pub struct AgentAction {
    pub tool_call: ToolCall,
    pub log: String,
    pub step: usize,
    pub run_id: String,
    pub parent_run_id: Option<String>,
    pub tags: Vec<String>,
}

/// Decision-level view of a step that ended the run. Notification only.
#[derive(Debug, Clone)]
pub struct AgentFinish {
    pub output: String,
    pub log: String,
    pub step: usize,
    pub run_id: String,
    pub parent_run_id: Option<String>,
    pub tags: Vec<String>,
}

impl AgentAction {
    pub(crate) fn from_step(step: &StepResult, run: &RunContext) -> Vec<Self> {
        step.tool_calls
            .iter()
            .map(|call| Self {
                tool_call: call.clone(),
                log: step.text.clone(),
                step: step.index,
                run_id: run.run_id().to_string(),
                parent_run_id: run.parent_run_id().map(String::from),
                tags: run.tags().to_vec(),
            })
            .collect()
    }
}

impl AgentFinish {
    pub(crate) fn from_step(step: &StepResult, run: &RunContext) -> Self {
        Self {
            output: step.text.clone(),
            log: step.text.clone(),
            step: step.index,
            run_id: run.run_id().to_string(),
            parent_run_id: run.parent_run_id().map(String::from),
            tags: run.tags().to_vec(),
        }
    }
}

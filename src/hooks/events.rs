//! Event vocabulary emitted by the agent loop.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::agent::{AgentResult, RunContext, StepResult};
use crate::types::{Message, ToolCall, ToolResult};

/// Event kinds, in the order they nest within one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    RunStart,
    StepStart,
    Chunk,
    ToolCallStart,
    ToolCallFinish,
    StepFinish,
    RunFinish,
    RunError,
}

impl EventKind {
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::RunStart,
            EventKind::StepStart,
            EventKind::Chunk,
            EventKind::ToolCallStart,
            EventKind::ToolCallFinish,
            EventKind::StepFinish,
            EventKind::RunFinish,
            EventKind::RunError,
        ]
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::RunStart => write!(f, "run_start"),
            EventKind::StepStart => write!(f, "step_start"),
            EventKind::Chunk => write!(f, "chunk"),
            EventKind::ToolCallStart => write!(f, "tool_call_start"),
            EventKind::ToolCallFinish => write!(f, "tool_call_finish"),
            EventKind::StepFinish => write!(f, "step_finish"),
            EventKind::RunFinish => write!(f, "run_finish"),
            EventKind::RunError => write!(f, "run_error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunStartEvent {
    pub run: RunContext,
    /// Transcript the run starts from
    pub messages: Vec<Message>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StepStartEvent {
    pub run: RunContext,
    pub step: usize,
    pub message_count: usize,
}

#[derive(Debug, Clone)]
pub struct ChunkEvent {
    pub run: RunContext,
    pub step: usize,
    pub delta: String,
}

#[derive(Debug, Clone)]
pub struct ToolCallStartEvent {
    pub run: RunContext,
    pub step: usize,
    pub call: ToolCall,
}

#[derive(Debug, Clone)]
pub struct ToolCallFinishEvent {
    pub run: RunContext,
    pub step: usize,
    pub call: ToolCall,
    pub result: ToolResult,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct StepFinishEvent {
    pub run: RunContext,
    pub step: StepResult,
}

#[derive(Debug, Clone)]
pub struct RunFinishEvent {
    pub run: RunContext,
    pub result: Box<AgentResult>,
}

#[derive(Debug, Clone)]
pub struct RunErrorEvent {
    pub run: RunContext,
    pub step: Option<usize>,
    pub error: String,
}

/// A single notification travelling through the [`EventBus`](super::EventBus).
#[derive(Debug, Clone)]
pub enum AgentEvent {
    RunStart(RunStartEvent),
    StepStart(StepStartEvent),
    Chunk(ChunkEvent),
    ToolCallStart(ToolCallStartEvent),
    ToolCallFinish(ToolCallFinishEvent),
    StepFinish(StepFinishEvent),
    RunFinish(RunFinishEvent),
    RunError(RunErrorEvent),
}

impl AgentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AgentEvent::RunStart(_) => EventKind::RunStart,
            AgentEvent::StepStart(_) => EventKind::StepStart,
            AgentEvent::Chunk(_) => EventKind::Chunk,
            AgentEvent::ToolCallStart(_) => EventKind::ToolCallStart,
            AgentEvent::ToolCallFinish(_) => EventKind::ToolCallFinish,
            AgentEvent::StepFinish(_) => EventKind::StepFinish,
            AgentEvent::RunFinish(_) => EventKind::RunFinish,
            AgentEvent::RunError(_) => EventKind::RunError,
        }
    }

    pub fn run(&self) -> &RunContext {
        match self {
            AgentEvent::RunStart(e) => &e.run,
            AgentEvent::StepStart(e) => &e.run,
            AgentEvent::Chunk(e) => &e.run,
            AgentEvent::ToolCallStart(e) => &e.run,
            AgentEvent::ToolCallFinish(e) => &e.run,
            AgentEvent::StepFinish(e) => &e.run,
            AgentEvent::RunFinish(e) => &e.run,
            AgentEvent::RunError(e) => &e.run,
        }
    }
}

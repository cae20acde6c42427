//! Single typed event bus feeding both callback vocabularies.

use tracing::trace;

use super::callbacks::{Callbacks, Listener};
use super::events::{AgentEvent, EventKind};
use super::legacy::LegacyHooks;
use crate::agent::{AgentAction, AgentFinish};

/// Dispatches each loop event once, synchronously, on the calling path.
///
/// Structured listeners fire first, then the legacy hook mapped to the same
/// event. Kinds with no subscriber are skipped without building a payload.
#[derive(Clone, Debug, Default)]
pub struct EventBus {
    callbacks: Callbacks,
    legacy: LegacyHooks,
}

impl EventBus {
    pub fn new(callbacks: Callbacks, legacy: LegacyHooks) -> Self {
        Self { callbacks, legacy }
    }

    pub fn listens(&self, kind: EventKind) -> bool {
        let cb = &self.callbacks;
        let legacy = &self.legacy;
        match kind {
            EventKind::RunStart => cb.run_start.is_some(),
            EventKind::StepStart => cb.step_start.is_some() || legacy.llm_start.is_some(),
            EventKind::Chunk => cb.chunk.is_some(),
            EventKind::ToolCallStart => cb.tool_call_start.is_some() || legacy.tool_start.is_some(),
            EventKind::ToolCallFinish => {
                cb.tool_call_finish.is_some()
                    || legacy.tool_end.is_some()
                    || legacy.tool_error.is_some()
            }
            EventKind::StepFinish => {
                cb.step_finish.is_some()
                    || legacy.llm_end.is_some()
                    || legacy.agent_action.is_some()
            }
            EventKind::RunFinish => cb.run_finish.is_some() || legacy.agent_finish.is_some(),
            EventKind::RunError => cb.run_error.is_some() || legacy.chain_error.is_some(),
        }
    }

    /// Build and emit an event only if something subscribes to its kind.
    pub fn emit_with(&self, kind: EventKind, build: impl FnOnce() -> AgentEvent) {
        if self.listens(kind) {
            self.emit(&build());
        }
    }

    pub fn emit(&self, event: &AgentEvent) {
        trace!(kind = %event.kind(), run_id = %event.run().run_id(), "Dispatching event");
        let cb = &self.callbacks;
        let legacy = &self.legacy;
        match event {
            AgentEvent::RunStart(e) => fire(&cb.run_start, e),
            AgentEvent::StepStart(e) => {
                fire(&cb.step_start, e);
                fire(&legacy.llm_start, e);
            }
            AgentEvent::Chunk(e) => fire(&cb.chunk, e),
            AgentEvent::ToolCallStart(e) => {
                fire(&cb.tool_call_start, e);
                fire(&legacy.tool_start, &e.call);
            }
            AgentEvent::ToolCallFinish(e) => {
                fire(&cb.tool_call_finish, e);
                if e.result.is_error() {
                    fire(&legacy.tool_error, &e.result);
                } else {
                    fire(&legacy.tool_end, &e.result);
                }
            }
            AgentEvent::StepFinish(e) => {
                fire(&cb.step_finish, e);
                fire(&legacy.llm_end, &e.step);
                if let Some(hook) = &legacy.agent_action {
                    for action in AgentAction::from_step(&e.step, &e.run) {
                        hook(&action);
                    }
                }
            }
            AgentEvent::RunFinish(e) => {
                fire(&cb.run_finish, e);
                if let (Some(hook), Some(last)) = (&legacy.agent_finish, e.result.last_step()) {
                    hook(&AgentFinish::from_step(last, &e.run));
                }
            }
            AgentEvent::RunError(e) => {
                fire(&cb.run_error, e);
                fire(&legacy.chain_error, e);
            }
        }
    }
}

fn fire<E>(listener: &Option<Listener<E>>, event: &E) {
    if let Some(listener) = listener {
        listener(event);
    }
}

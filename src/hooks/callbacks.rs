//! Structured callback sets and the engine/invocation merge rule.

use std::sync::Arc;

use super::events::{
    ChunkEvent, RunErrorEvent, RunFinishEvent, RunStartEvent, StepFinishEvent, StepStartEvent,
    ToolCallFinishEvent, ToolCallStartEvent,
};

/// Synchronous listener for one event type.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// One optional listener per structured event type.
///
/// An engine-level set is fixed at construction and an invocation-level set may
/// be passed per call; [`Callbacks::merge`] combines them.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub(crate) run_start: Option<Listener<RunStartEvent>>,
    pub(crate) step_start: Option<Listener<StepStartEvent>>,
    pub(crate) chunk: Option<Listener<ChunkEvent>>,
    pub(crate) tool_call_start: Option<Listener<ToolCallStartEvent>>,
    pub(crate) tool_call_finish: Option<Listener<ToolCallFinishEvent>>,
    pub(crate) step_finish: Option<Listener<StepFinishEvent>>,
    pub(crate) run_finish: Option<Listener<RunFinishEvent>>,
    pub(crate) run_error: Option<Listener<RunErrorEvent>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_run_start(mut self, f: impl Fn(&RunStartEvent) + Send + Sync + 'static) -> Self {
        self.run_start = Some(Arc::new(f));
        self
    }

    pub fn on_step_start(mut self, f: impl Fn(&StepStartEvent) + Send + Sync + 'static) -> Self {
        self.step_start = Some(Arc::new(f));
        self
    }

    pub fn on_chunk(mut self, f: impl Fn(&ChunkEvent) + Send + Sync + 'static) -> Self {
        self.chunk = Some(Arc::new(f));
        self
    }

    pub fn on_tool_call_start(
        mut self,
        f: impl Fn(&ToolCallStartEvent) + Send + Sync + 'static,
    ) -> Self {
        self.tool_call_start = Some(Arc::new(f));
        self
    }

    pub fn on_tool_call_finish(
        mut self,
        f: impl Fn(&ToolCallFinishEvent) + Send + Sync + 'static,
    ) -> Self {
        self.tool_call_finish = Some(Arc::new(f));
        self
    }

    pub fn on_step_finish(mut self, f: impl Fn(&StepFinishEvent) + Send + Sync + 'static) -> Self {
        self.step_finish = Some(Arc::new(f));
        self
    }

    pub fn on_run_finish(mut self, f: impl Fn(&RunFinishEvent) + Send + Sync + 'static) -> Self {
        self.run_finish = Some(Arc::new(f));
        self
    }

    pub fn on_run_error(mut self, f: impl Fn(&RunErrorEvent) + Send + Sync + 'static) -> Self {
        self.run_error = Some(Arc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.run_start.is_none()
            && self.step_start.is_none()
            && self.chunk.is_none()
            && self.tool_call_start.is_none()
            && self.tool_call_finish.is_none()
            && self.step_finish.is_none()
            && self.run_finish.is_none()
            && self.run_error.is_none()
    }

    /// Merge engine-level and invocation-level sets.
    ///
    /// Per event type: both present fires the engine listener, then the
    /// invocation listener; one present fires alone; none leaves the slot empty.
    pub fn merge(engine: Option<&Callbacks>, call: Option<&Callbacks>) -> Callbacks {
        match (engine, call) {
            (None, None) => Callbacks::default(),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (Some(engine), Some(call)) => Callbacks {
                run_start: merge_listener(&engine.run_start, &call.run_start),
                step_start: merge_listener(&engine.step_start, &call.step_start),
                chunk: merge_listener(&engine.chunk, &call.chunk),
                tool_call_start: merge_listener(&engine.tool_call_start, &call.tool_call_start),
                tool_call_finish: merge_listener(&engine.tool_call_finish, &call.tool_call_finish),
                step_finish: merge_listener(&engine.step_finish, &call.step_finish),
                run_finish: merge_listener(&engine.run_finish, &call.run_finish),
                run_error: merge_listener(&engine.run_error, &call.run_error),
            },
        }
    }
}

fn merge_listener<E: 'static>(
    first: &Option<Listener<E>>,
    second: &Option<Listener<E>>,
) -> Option<Listener<E>> {
    match (first, second) {
        (Some(first), Some(second)) => {
            let (first, second) = (Arc::clone(first), Arc::clone(second));
            let merged: Listener<E> = Arc::new(move |event: &E| {
                first(event);
                second(event);
            });
            Some(merged)
        }
        (Some(only), None) | (None, Some(only)) => Some(Arc::clone(only)),
        (None, None) => None,
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("run_start", &self.run_start.is_some())
            .field("step_start", &self.step_start.is_some())
            .field("chunk", &self.chunk.is_some())
            .field("tool_call_start", &self.tool_call_start.is_some())
            .field("tool_call_finish", &self.tool_call_finish.is_some())
            .field("step_finish", &self.step_finish.is_some())
            .field("run_finish", &self.run_finish.is_some())
            .field("run_error", &self.run_error.is_some())
            .finish()
    }
}

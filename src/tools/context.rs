//! Call-scoped execution record handed to local tools.

use tokio_util::sync::CancellationToken;

use crate::agent::RunContext;

#[derive(Debug, Clone)]
pub struct ToolContext {
    call_id: String,
    step: usize,
    run: RunContext,
    cancel: CancellationToken,
}

impl ToolContext {
    pub fn new(
        call_id: impl Into<String>,
        step: usize,
        run: RunContext,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            step,
            run,
            cancel,
        }
    }

    /// Context outside any run, for invoking a tool directly.
    pub fn detached(call_id: impl Into<String>) -> Self {
        Self::new(call_id, 0, RunContext::new(), CancellationToken::new())
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn run(&self) -> &RunContext {
        &self.run
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

//! Sequential tool dispatch for one step.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::approval::ApprovalPolicy;
use super::context::ToolContext;
use super::registry::ToolIndex;
use super::traits::ToolExecution;
use crate::agent::{AgentMetrics, RunContext};
use crate::hooks::{AgentEvent, EventBus, EventKind, ToolCallFinishEvent, ToolCallStartEvent};
use crate::types::{ToolCall, ToolError, ToolResult};

/// Borrowed view of everything a step needs to run its tool calls.
pub struct ToolDispatcher<'a> {
    pub index: &'a ToolIndex,
    pub approval: &'a ApprovalPolicy,
    pub bus: &'a EventBus,
    pub run: &'a RunContext,
    pub cancel: &'a CancellationToken,
}

impl ToolDispatcher<'_> {
    /// Resolve every call in order. Tool failures become error results; nothing here aborts the run.
    pub async fn dispatch(
        &self,
        step: usize,
        calls: &[ToolCall],
        metrics: &mut AgentMetrics,
    ) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            self.bus.emit_with(EventKind::ToolCallStart, || {
                AgentEvent::ToolCallStart(ToolCallStartEvent {
                    run: self.run.clone(),
                    step,
                    call: call.clone(),
                })
            });

            let start = Instant::now();
            let result = self.resolve(step, call).await;
            let elapsed = start.elapsed();

            if result.deferred {
                metrics.record_deferred();
            } else {
                metrics.record_tool(&call.name, result.duration_ms, result.is_error());
            }

            self.bus.emit_with(EventKind::ToolCallFinish, || {
                AgentEvent::ToolCallFinish(ToolCallFinishEvent {
                    run: self.run.clone(),
                    step,
                    call: call.clone(),
                    result: result.clone(),
                    elapsed,
                })
            });

            results.push(result);
        }

        results
    }

    async fn resolve(&self, step: usize, call: &ToolCall) -> ToolResult {
        if let Err(e) = self.approval.check(call, self.run).await {
            warn!(tool = %call.name, call_id = %call.id, "Tool call rejected");
            return ToolResult::error(call, e, 0);
        }

        let Some(tool) = self.index.get(&call.name) else {
            warn!(tool = %call.name, call_id = %call.id, "Unknown tool requested");
            return ToolResult::error(call, ToolError::not_found(&call.name), 0);
        };

        if tool.execution() == ToolExecution::Deferred {
            debug!(tool = %call.name, call_id = %call.id, "Tool deferred to backend");
            return ToolResult::deferred(call);
        }

        let context = ToolContext::new(&call.id, step, self.run.clone(), self.cancel.clone());
        let start = Instant::now();
        let outcome = tool.execute(call.arguments.clone(), &context).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(value) => ToolResult::success(call, value, duration_ms),
            Err(e) => ToolResult::error(call, e, duration_ms),
        };
        debug!(
            tool = %call.name,
            duration_ms,
            is_error = result.is_error(),
            "Tool execution completed"
        );
        result
    }
}

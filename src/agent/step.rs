//! Single request/response cycle against the backend.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::{SamplingConfig, TimeoutConfig};
use super::events::StepResult;
use super::run_context::RunContext;
use crate::backend::{Backend, BackendResponse, ResponseAccumulator};
use crate::hooks::{AgentEvent, ChunkEvent, EventBus, EventKind};
use crate::types::{Message, ToolDefinition, ToolResult, Usage};
use crate::{Error, Result};

/// Everything the backend sees for one step.
///
/// A [`PrepareStep`] hook may rewrite any field; the rewrite applies to this
/// backend call only, except `custom`, which is carried into the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPreparation {
    pub system_prompt: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub sampling: SamplingConfig,
    /// Usage accumulated by earlier steps of this run
    pub usage: Usage,
    /// 1-based step number
    pub step: usize,
    pub run: RunContext,
    /// Opaque data owned by the pre-call hook
    pub custom: Option<serde_json::Value>,
}

/// Pre-call hook invoked before every backend call.
#[async_trait]
pub trait PrepareStep: Send + Sync {
    async fn prepare(&self, call: CallPreparation) -> Result<CallPreparation>;
}

/// Backend response plus what the step needs to carry forward.
#[derive(Debug)]
pub(crate) struct StepOutcome {
    pub response: BackendResponse,
    pub custom: Option<serde_json::Value>,
    pub duration_ms: u64,
}

pub(crate) struct StepExecutor<'a> {
    pub backend: &'a dyn Backend,
    pub prepare: Option<&'a Arc<dyn PrepareStep>>,
    pub bus: &'a EventBus,
    pub timeouts: &'a TimeoutConfig,
    pub streaming: bool,
    pub cancel: &'a CancellationToken,
}

impl StepExecutor<'_> {
    /// Run one backend call. Every failure is wrapped with the step number.
    pub async fn call(&self, preparation: CallPreparation) -> Result<StepOutcome> {
        let step = preparation.step;
        let preparation = match self.prepare {
            Some(hook) => hook.prepare(preparation).await.map_err(|e| e.at_step(step))?,
            None => preparation,
        };

        let start = Instant::now();
        let response = with_timeout(self.timeouts.step, self.request(&preparation))
            .await
            .map_err(|e| e.at_step(step))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            step,
            duration_ms,
            finish_reason = %response.finish_reason,
            tool_calls = response.tool_calls.len(),
            "Backend call completed"
        );

        Ok(StepOutcome {
            response,
            custom: preparation.custom,
            duration_ms,
        })
    }

    async fn request(&self, preparation: &CallPreparation) -> Result<BackendResponse> {
        if !self.streaming {
            return self.backend.generate(self.cancel, preparation).await;
        }

        let mut stream = self.backend.stream(self.cancel, preparation).await?;
        let mut acc = ResponseAccumulator::new();
        while let Some(chunk) = with_timeout(self.timeouts.chunk, async { Ok(stream.next().await) })
            .await?
        {
            if let Some(delta) = acc.push(chunk?) {
                self.bus.emit_with(EventKind::Chunk, || {
                    AgentEvent::Chunk(ChunkEvent {
                        run: preparation.run.clone(),
                        step: preparation.step,
                        delta,
                    })
                });
            }
        }
        Ok(acc.finish())
    }
}

/// Translate a backend response and its dispatched tool results into a step record.
pub(crate) fn step_result(
    index: usize,
    response: BackendResponse,
    tool_results: Vec<ToolResult>,
    duration_ms: u64,
) -> StepResult {
    let message = Message::assistant_turn(&response.text, &response.tool_calls);
    StepResult {
        index,
        text: response.text,
        tool_calls: response.tool_calls,
        tool_results,
        finish_reason: response.finish_reason,
        usage: response.usage,
        warnings: response.warnings,
        message,
        duration_ms,
    }
}

pub(crate) async fn with_timeout<T>(
    limit: Option<Duration>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout(limit))?,
        None => fut.await,
    }
}

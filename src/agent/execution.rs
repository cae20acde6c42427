//! Agent execution loop.

use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::events::{AgentResult, StepResult};
use super::executor::Agent;
use super::run_context::RunContext;
use super::state::AgentMetrics;
use super::step::{CallPreparation, StepExecutor, step_result, with_timeout};
use super::stop::StopState;
use crate::hooks::{
    AgentEvent, Callbacks, EventBus, EventKind, RunErrorEvent, RunFinishEvent, RunStartEvent,
    StepFinishEvent, StepStartEvent,
};
use crate::tools::ToolDispatcher;
use crate::types::{FinishReason, Message, Usage};
use crate::{Error, Result};

/// Per-invocation options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Merged after the engine-level callbacks
    pub callbacks: Option<Callbacks>,
    /// Run identity; a fresh run id is generated when absent or empty
    pub context: Option<RunContext>,
    /// Cancelling this token aborts the run with [`Error::Cancelled`]
    pub cancel: Option<CancellationToken>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// How the loop ended.
struct Termination {
    reason: String,
    finish_reason: FinishReason,
    exhausted: bool,
}

impl Agent {
    pub async fn execute(&self, prompt: impl Into<String>) -> Result<AgentResult> {
        self.execute_messages_with(vec![Message::user(prompt)], RunOptions::default())
            .await
    }

    pub async fn execute_with(
        &self,
        prompt: impl Into<String>,
        options: RunOptions,
    ) -> Result<AgentResult> {
        self.execute_messages_with(vec![Message::user(prompt)], options)
            .await
    }

    /// Execute against an existing transcript.
    pub async fn execute_messages(&self, messages: Vec<Message>) -> Result<AgentResult> {
        self.execute_messages_with(messages, RunOptions::default())
            .await
    }

    pub async fn execute_messages_with(
        &self,
        messages: Vec<Message>,
        options: RunOptions,
    ) -> Result<AgentResult> {
        let run = options.context.unwrap_or_default().ensure_run_id();
        let bus = EventBus::new(
            Callbacks::merge(self.callbacks.as_ref(), options.callbacks.as_ref()),
            self.legacy_hooks.clone(),
        );

        let parent = options.cancel.unwrap_or_default();
        let cancel = parent.child_token();
        // Cancels every nested scope when the run ends, times out, or is dropped.
        let _guard = cancel.clone().drop_guard();

        let outcome = tokio::select! {
            biased;
            _ = parent.cancelled() => Err(Error::Cancelled),
            result = with_timeout(
                self.config.timeouts.run,
                self.run_loop(messages, &run, &bus, &cancel),
            ) => result,
        };

        match outcome {
            Ok(result) => {
                bus.emit_with(EventKind::RunFinish, || {
                    AgentEvent::RunFinish(RunFinishEvent {
                        run: run.clone(),
                        result: Box::new(result.clone()),
                    })
                });
                Ok(result)
            }
            Err(e) => {
                warn!(run_id = %run.run_id(), step = ?e.step(), error = %e, "Agent execution failed");
                bus.emit_with(EventKind::RunError, || {
                    AgentEvent::RunError(RunErrorEvent {
                        run: run.clone(),
                        step: e.step(),
                        error: e.to_string(),
                    })
                });
                Err(e)
            }
        }
    }

    #[instrument(name = "agent_run", skip_all, fields(run_id = %run.run_id()))]
    async fn run_loop(
        &self,
        mut messages: Vec<Message>,
        run: &RunContext,
        bus: &EventBus,
        cancel: &CancellationToken,
    ) -> Result<AgentResult> {
        let start = Instant::now();
        let started_at = Utc::now();
        let index = self.tools.index();
        let definitions = self.tools.definitions();

        bus.emit_with(EventKind::RunStart, || {
            AgentEvent::RunStart(RunStartEvent {
                run: run.clone(),
                messages: messages.clone(),
                started_at,
            })
        });
        info!(
            messages = messages.len(),
            tools = definitions.len(),
            max_steps = self.max_steps,
            "Starting agent execution"
        );

        let executor = StepExecutor {
            backend: self.backend.as_ref(),
            prepare: self.prepare_step.as_ref(),
            bus,
            timeouts: &self.config.timeouts,
            streaming: self.config.execution.streaming,
            cancel,
        };
        let dispatcher = ToolDispatcher {
            index: &index,
            approval: &self.approval,
            bus,
            run,
            cancel,
        };

        let mut steps: Vec<StepResult> = Vec::new();
        let mut usage = Usage::default();
        let mut metrics = AgentMetrics::default();
        let mut custom = None;

        let termination = loop {
            let step = steps.len() + 1;
            bus.emit_with(EventKind::StepStart, || {
                AgentEvent::StepStart(StepStartEvent {
                    run: run.clone(),
                    step,
                    message_count: messages.len(),
                })
            });

            let outcome = executor
                .call(CallPreparation {
                    system_prompt: self.config.system_prompt.clone(),
                    messages: messages.clone(),
                    tools: definitions.clone(),
                    sampling: self.config.sampling.clone(),
                    usage,
                    step,
                    run: run.clone(),
                    custom: custom.take(),
                })
                .await?;
            metrics.record_backend_call(outcome.duration_ms);
            custom = outcome.custom;
            usage.add(&outcome.response.usage);

            let continuable = outcome.response.finish_reason == FinishReason::ToolCalls
                && !outcome.response.tool_calls.is_empty();
            let tool_results = if continuable {
                dispatcher
                    .dispatch(step, &outcome.response.tool_calls, &mut metrics)
                    .await
            } else {
                Vec::new()
            };

            let result = step_result(step, outcome.response, tool_results, outcome.duration_ms);
            messages.push(result.message.clone());
            let blocks: Vec<_> = result
                .tool_results
                .iter()
                .filter_map(|r| r.to_content_block())
                .collect();
            if !blocks.is_empty() {
                messages.push(Message::tool_results(blocks));
            }

            debug!(
                step,
                finish_reason = %result.finish_reason,
                tool_calls = result.tool_calls.len(),
                "Step completed"
            );

            bus.emit_with(EventKind::StepFinish, || {
                AgentEvent::StepFinish(StepFinishEvent {
                    run: run.clone(),
                    step: result.clone(),
                })
            });

            let finish_reason = result.finish_reason.clone();
            steps.push(result);

            if !continuable {
                break Termination {
                    reason: finish_reason.to_string(),
                    finish_reason,
                    exhausted: false,
                };
            }

            let state = StopState {
                steps: &steps,
                messages: &messages,
                usage: &usage,
            };
            if let Some(hit) = self.stop_conditions.evaluate(&state) {
                debug!(reason = %hit.reason, "Stop condition satisfied");
                break Termination {
                    reason: hit.reason,
                    finish_reason: if hit.step_budget {
                        FinishReason::Length
                    } else {
                        finish_reason
                    },
                    exhausted: hit.step_budget,
                };
            }

            if steps.len() >= self.max_steps {
                break Termination {
                    reason: super::stop::MAX_STEPS_REASON.to_string(),
                    finish_reason: FinishReason::Length,
                    exhausted: true,
                };
            }
        };

        let mut warnings: Vec<String> = steps.iter().flat_map(|s| s.warnings.clone()).collect();
        if termination.exhausted {
            warn!(steps = steps.len(), "Reached maximum steps");
            warnings.push(format!("reached maximum steps ({})", steps.len()));
        }

        metrics.steps = steps.len();
        metrics.execution_time_ms = start.elapsed().as_millis() as u64;

        let text = steps
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let tool_results = steps
            .iter()
            .flat_map(|s| s.tool_results.iter().cloned())
            .collect();

        info!(
            steps = steps.len(),
            tool_calls = metrics.tool_calls,
            total_tokens = usage.total(),
            stop_reason = %termination.reason,
            "Agent execution completed"
        );

        Ok(AgentResult {
            text,
            steps,
            tool_results,
            usage,
            warnings,
            stop_reason: termination.reason,
            finish_reason: termination.finish_reason,
            run: run.clone(),
            messages,
            metrics,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

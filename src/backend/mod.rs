//! Text-generation backend contract.
//!
//! The engine drives any backend through [`Backend`]; vendor wire formats live
//! behind implementations of this trait.

#[cfg(test)]
pub(crate) mod testing;

use std::fmt::Debug;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::agent::CallPreparation;
use crate::types::{FinishReason, ToolCall, Usage};

/// One complete backend turn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackendResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    pub warnings: Vec<String>,
}

impl BackendResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: FinishReason::Stop,
            ..Default::default()
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            finish_reason: FinishReason::ToolCalls,
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Split into the chunk sequence a streaming backend would have produced.
    pub fn into_chunks(self) -> Vec<StreamChunk> {
        let mut chunks = Vec::with_capacity(self.tool_calls.len() + self.warnings.len() + 2);
        if !self.text.is_empty() {
            chunks.push(StreamChunk::Text(self.text));
        }
        chunks.extend(self.tool_calls.into_iter().map(StreamChunk::ToolCall));
        chunks.extend(self.warnings.into_iter().map(StreamChunk::Warning));
        chunks.push(StreamChunk::Finish {
            finish_reason: self.finish_reason,
            usage: self.usage,
        });
        chunks
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Text(String),
    ToolCall(ToolCall),
    Warning(String),
    Finish {
        finish_reason: FinishReason,
        usage: Usage,
    },
}

pub type ChunkStream = BoxStream<'static, Result<StreamChunk>>;

/// Folds stream chunks into a [`BackendResponse`].
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    response: BackendResponse,
    finished: bool,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text delta carried by the chunk, if any.
    pub fn push(&mut self, chunk: StreamChunk) -> Option<String> {
        match chunk {
            StreamChunk::Text(delta) => {
                self.response.text.push_str(&delta);
                return Some(delta);
            }
            StreamChunk::ToolCall(call) => self.response.tool_calls.push(call),
            StreamChunk::Warning(warning) => self.response.warnings.push(warning),
            StreamChunk::Finish {
                finish_reason,
                usage,
            } => {
                self.response.finish_reason = finish_reason;
                self.response.usage.add(&usage);
                self.finished = true;
            }
        }
        None
    }

    pub fn finish(mut self) -> BackendResponse {
        if !self.finished {
            self.response
                .warnings
                .push("stream ended without a finish reason".to_string());
        }
        self.response
    }
}

#[async_trait]
pub trait Backend: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn generate(
        &self,
        cancel: &CancellationToken,
        call: &CallPreparation,
    ) -> Result<BackendResponse>;

    /// Incremental variant. The default wraps [`Backend::generate`].
    async fn stream(&self, cancel: &CancellationToken, call: &CallPreparation) -> Result<ChunkStream> {
        let response = self.generate(cancel, call).await?;
        Ok(futures::stream::iter(response.into_chunks().into_iter().map(Ok)).boxed())
    }
}

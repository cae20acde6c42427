//! Scripted backend for engine tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use super::{Backend, BackendResponse, ChunkStream, StreamChunk};
use crate::agent::CallPreparation;
use crate::{Error, Result};

#[derive(Debug)]
enum Scripted {
    Respond(Duration, BackendResponse),
    Fail(String),
    Chunks(Vec<(Duration, StreamChunk)>),
}

/// Replays queued turns in order and records every request it receives.
#[derive(Debug, Default)]
pub(crate) struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CallPreparation>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: BackendResponse) -> Self {
        self.respond_after(Duration::ZERO, response)
    }

    pub fn respond_after(self, delay: Duration, response: BackendResponse) -> Self {
        self.push(Scripted::Respond(delay, response))
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Fail(message.into()))
    }

    pub fn stream_chunks(self, chunks: Vec<(Duration, StreamChunk)>) -> Self {
        self.push(Scripted::Chunks(chunks))
    }

    pub fn requests(&self) -> Vec<CallPreparation> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(self, turn: Scripted) -> Self {
        self.script.lock().unwrap().push_back(turn);
        self
    }

    fn next_turn(&self, call: &CallPreparation) -> Result<Scripted> {
        self.requests.lock().unwrap().push(call.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::backend("script exhausted"))
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        cancel: &CancellationToken,
        call: &CallPreparation,
    ) -> Result<BackendResponse> {
        match self.next_turn(call)? {
            Scripted::Respond(delay, response) => {
                if !delay.is_zero() {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                    }
                }
                Ok(response)
            }
            Scripted::Fail(message) => Err(Error::backend(message)),
            Scripted::Chunks(_) => Err(Error::backend("chunked turn requested without streaming")),
        }
    }

    async fn stream(&self, cancel: &CancellationToken, call: &CallPreparation) -> Result<ChunkStream> {
        match self.next_turn(call)? {
            Scripted::Chunks(chunks) => Ok(futures::stream::iter(chunks)
                .then(|(delay, chunk)| async move {
                    tokio::time::sleep(delay).await;
                    Ok(chunk)
                })
                .boxed()),
            Scripted::Respond(delay, response) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                }
                Ok(futures::stream::iter(response.into_chunks().into_iter().map(Ok)).boxed())
            }
            Scripted::Fail(message) => Err(Error::backend(message)),
        }
    }
}

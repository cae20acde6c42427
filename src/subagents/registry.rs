//! Subagent registry and delegation.

use tracing::{debug, info};

use super::{Subagent, SubagentDelegation};
use crate::Result;
use crate::agent::RunOptions;
use crate::common::{NamedRegistry, RegistryError};
use crate::types::Message;

#[derive(Debug, Clone)]
pub struct SubagentRegistry {
    inner: NamedRegistry<Subagent>,
}

impl Default for SubagentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubagentRegistry {
    pub fn new() -> Self {
        Self {
            inner: NamedRegistry::new("subagent"),
        }
    }

    pub fn register(&mut self, subagent: Subagent) -> std::result::Result<(), RegistryError> {
        self.inner.register(subagent)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Subagent> {
        self.inner.unregister(name)
    }

    pub fn get(&self, name: &str) -> Option<&Subagent> {
        self.inner.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.has(name)
    }

    pub fn list(&self) -> Vec<&str> {
        self.inner.list()
    }

    pub fn subagents(&self) -> impl Iterator<Item = &Subagent> {
        self.inner.items()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub async fn delegate(&self, name: &str, prompt: impl Into<String>) -> Result<SubagentDelegation> {
        self.delegate_with(name, vec![Message::user(prompt)], RunOptions::default())
            .await
    }

    pub async fn delegate_messages(
        &self,
        name: &str,
        messages: Vec<Message>,
    ) -> Result<SubagentDelegation> {
        self.delegate_with(name, messages, RunOptions::default())
            .await
    }

    /// `Err` only when no subagent is registered under `name`; execution
    /// failures are reported in [`SubagentDelegation::result`].
    pub async fn delegate_with(
        &self,
        name: &str,
        messages: Vec<Message>,
        options: RunOptions,
    ) -> Result<SubagentDelegation> {
        let subagent = self.inner.require(name)?;
        debug!(subagent = %name, messages = messages.len(), "Delegating to subagent");

        let result = subagent
            .agent()
            .execute_messages_with(messages.clone(), options)
            .await;

        info!(
            subagent = %name,
            success = result.is_ok(),
            "Subagent delegation completed"
        );

        Ok(SubagentDelegation {
            name: name.to_string(),
            messages,
            result,
        })
    }
}

//! Named, stateless text-to-text capabilities.

mod registry;
mod skill_tool;

pub use registry::SkillRegistry;
pub use skill_tool::{SkillInput, SkillTool};

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::common::Named;

pub type SkillFuture = Pin<Box<dyn Future<Output = Result<String, String>> + Send>>;
pub type SkillHandler = Arc<dyn Fn(String) -> SkillFuture + Send + Sync>;

#[derive(Clone)]
pub struct Skill {
    name: String,
    description: Option<String>,
    instructions: Option<String>,
    metadata: HashMap<String, String>,
    handler: SkillHandler,
}

impl Skill {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            instructions: None,
            metadata: HashMap::new(),
            handler: Arc::new(move |input| Box::pin(handler(input))),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub async fn invoke(&self, input: impl Into<String>) -> Result<String, String> {
        (self.handler)(input.into()).await
    }
}

impl Named for Skill {
    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

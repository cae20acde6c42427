//! Skill registry.

use tracing::debug;

use super::Skill;
use crate::common::{NamedRegistry, RegistryError};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct SkillRegistry {
    inner: NamedRegistry<Skill>,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self {
            inner: NamedRegistry::new("skill"),
        }
    }

    pub fn register(&mut self, skill: Skill) -> std::result::Result<(), RegistryError> {
        self.inner.register(skill)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Skill> {
        self.inner.unregister(name)
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.inner.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.has(name)
    }

    pub fn list(&self) -> Vec<&str> {
        self.inner.list()
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
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

    pub async fn execute(&self, name: &str, input: impl Into<String>) -> Result<String> {
        let skill = self.inner.require(name)?;
        debug!(skill = %name, "Executing skill");
        skill.invoke(input).await.map_err(|message| Error::Skill {
            name: name.to_string(),
            message,
        })
    }
}

//! SkillTool - exposes a skill registry to the backend as a single tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::SkillRegistry;
use crate::tools::{SchemaTool, ToolContext};
use crate::types::ToolError;

/// Tool that dispatches to a snapshot of a [`SkillRegistry`] by skill name.
pub struct SkillTool {
    registry: Arc<SkillRegistry>,
    description: String,
}

impl SkillTool {
    pub fn new(registry: SkillRegistry) -> Self {
        let description = Self::build_description(&registry);
        Self {
            registry: Arc::new(registry),
            description,
        }
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    fn build_description(registry: &SkillRegistry) -> String {
        let skills = registry
            .list()
            .into_iter()
            .filter_map(|name| registry.get(name))
            .map(|skill| {
                let summary = skill
                    .description()
                    .or(skill.instructions())
                    .unwrap_or("no description");
                format!("- {}: {}", crate::common::Named::name(skill), summary)
            })
            .collect::<Vec<_>>();

        if skills.is_empty() {
            return Self::DESCRIPTION.to_string();
        }
        format!("{}\n\nAvailable skills:\n{}", Self::DESCRIPTION, skills.join("\n"))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SkillInput {
    /// The skill name
    pub skill: String,
    /// Text passed to the skill
    #[serde(default)]
    pub input: String,
}

#[async_trait]
impl SchemaTool for SkillTool {
    type Input = SkillInput;

    const NAME: &'static str = "skill";
    const DESCRIPTION: &'static str = "Execute a named skill with text input.";

    fn custom_description(&self) -> Option<&str> {
        Some(&self.description)
    }

    async fn handle(
        &self,
        input: SkillInput,
        _context: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        self.registry
            .execute(&input.skill, input.input)
            .await
            .map(serde_json::Value::String)
            .map_err(|e| ToolError::execution_failed(e.to_string()))
    }
}

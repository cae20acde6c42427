//! Tool trait definitions.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use super::context::ToolContext;
use crate::types::{ToolDefinition, ToolError};

/// Where a tool's computation happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolExecution {
    /// Invoked in-process by the dispatcher
    #[default]
    Local,
    /// Computed by the generation backend on a later turn
    Deferred,
}

/// Core tool trait for all tool implementations.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> serde_json::Value;

    fn execution(&self) -> ToolExecution {
        ToolExecution::Local
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        context: &ToolContext,
    ) -> Result<serde_json::Value, ToolError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
            .with_deferred(self.execution() == ToolExecution::Deferred)
    }
}

/// Schema-based tool trait with automatic JSON schema generation.
///
/// Provides a higher-level abstraction over `Tool` with typed inputs
/// and automatic schema derivation via schemars.
#[async_trait]
pub trait SchemaTool: Send + Sync {
    type Input: JsonSchema + DeserializeOwned + Send;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    /// Instance-specific description overriding `DESCRIPTION`.
    fn custom_description(&self) -> Option<&str> {
        None
    }

    async fn handle(
        &self,
        input: Self::Input,
        context: &ToolContext,
    ) -> Result<serde_json::Value, ToolError>;

    fn input_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(Self::Input);
        let mut value =
            serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));

        if let Some(obj) = value.as_object_mut()
            && !obj.contains_key("properties")
        {
            obj.insert(
                "properties".to_string(),
                serde_json::Value::Object(serde_json::Map::new()),
            );
        }

        value
    }
}

#[async_trait]
impl<T: SchemaTool + 'static> Tool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn description(&self) -> &str {
        self.custom_description().unwrap_or(T::DESCRIPTION)
    }

    fn input_schema(&self) -> serde_json::Value {
        T::input_schema()
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        context: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let typed = serde_json::from_value::<T::Input>(input)
            .map_err(|e| ToolError::invalid_input(e.to_string()))?;
        SchemaTool::handle(self, typed, context).await
    }
}

//! Serializable engine settings.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigResult};
use crate::agent::AgentBuilder;

/// Overrides applied on top of an [`AgentBuilder`]. Unset fields leave the
/// builder untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl EngineSettings {
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a JSON file. A missing file yields empty settings.
    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    /// Read `<PREFIX>MAX_STEPS`, `<PREFIX>RUN_TIMEOUT_SECS` and friends.
    pub fn from_env(prefix: &str) -> ConfigResult<Self> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let read = |name: &str| {
            let key = format!("{}{}", prefix, name);
            lookup(&key).map(|value| (key, value))
        };

        Ok(Self {
            system_prompt: read("SYSTEM_PROMPT").map(|(_, v)| v),
            max_steps: parse(read("MAX_STEPS"))?,
            run_timeout_secs: parse(read("RUN_TIMEOUT_SECS"))?,
            step_timeout_secs: parse(read("STEP_TIMEOUT_SECS"))?,
            chunk_timeout_secs: parse(read("CHUNK_TIMEOUT_SECS"))?,
            streaming: parse(read("STREAMING"))?,
            temperature: parse(read("TEMPERATURE"))?,
            max_tokens: parse(read("MAX_TOKENS"))?,
        })
    }

    /// Fields set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            system_prompt: other.system_prompt.or(self.system_prompt),
            max_steps: other.max_steps.or(self.max_steps),
            run_timeout_secs: other.run_timeout_secs.or(self.run_timeout_secs),
            step_timeout_secs: other.step_timeout_secs.or(self.step_timeout_secs),
            chunk_timeout_secs: other.chunk_timeout_secs.or(self.chunk_timeout_secs),
            streaming: other.streaming.or(self.streaming),
            temperature: other.temperature.or(self.temperature),
            max_tokens: other.max_tokens.or(self.max_tokens),
        }
    }

    pub fn apply(&self, mut builder: AgentBuilder) -> AgentBuilder {
        if let Some(prompt) = &self.system_prompt {
            builder = builder.system_prompt(prompt.clone());
        }
        if let Some(max) = self.max_steps {
            builder = builder.max_steps(max);
        }
        if let Some(secs) = self.run_timeout_secs {
            builder = builder.run_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.step_timeout_secs {
            builder = builder.step_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.chunk_timeout_secs {
            builder = builder.chunk_timeout(Duration::from_secs(secs));
        }
        if let Some(streaming) = self.streaming {
            builder = builder.streaming(streaming);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(tokens) = self.max_tokens {
            builder = builder.max_tokens(tokens);
        }
        builder
    }
}

fn parse<T>(entry: Option<(String, String)>) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    entry
        .map(|(key, value)| {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    key,
                    message: e.to_string(),
                })
        })
        .transpose()
}

//! Agent configuration types.
//!
//! Domain-separated configuration for clarity and maintainability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded to the backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl SamplingConfig {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p.clamp(0.0, 1.0));
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.stop_sequences.push(stop.into());
        self
    }
}

/// Execution behavior configuration.
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Step budget; `None` leaves the ceiling to the stop conditions
    pub max_steps: Option<usize>,
    /// Consume the backend incrementally
    pub streaming: bool,
}

impl ExecutionConfig {
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = Some(max);
        self
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.streaming = enabled;
        self
    }
}

/// Timeout policy. Each limit is optional and scoped independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Whole execution call
    pub run: Option<Duration>,
    /// One backend call, including stream consumption
    pub step: Option<Duration>,
    /// Gap between streaming chunks (detects stalled streams)
    pub chunk: Option<Duration>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            run: None,
            step: None,
            chunk: Some(Duration::from_secs(60)),
        }
    }
}

impl TimeoutConfig {
    pub fn none() -> Self {
        Self {
            run: None,
            step: None,
            chunk: None,
        }
    }

    pub fn with_run(mut self, timeout: Duration) -> Self {
        self.run = Some(timeout);
        self
    }

    pub fn with_step(mut self, timeout: Duration) -> Self {
        self.step = Some(timeout);
        self
    }

    pub fn with_chunk(mut self, timeout: Duration) -> Self {
        self.chunk = Some(timeout);
        self
    }

    pub fn without_chunk(mut self) -> Self {
        self.chunk = None;
        self
    }
}

/// Complete agent configuration combining all domain configs.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub system_prompt: Option<String>,
    pub execution: ExecutionConfig,
    pub timeouts: TimeoutConfig,
    pub sampling: SamplingConfig,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_execution(mut self, config: ExecutionConfig) -> Self {
        self.execution = config;
        self
    }

    pub fn with_timeouts(mut self, config: TimeoutConfig) -> Self {
        self.timeouts = config;
        self
    }

    pub fn with_sampling(mut self, config: SamplingConfig) -> Self {
        self.sampling = config;
        self
    }
}

//! File and environment overrides for engine settings.
//!
//! ```rust,no_run
//! use agent_engine::{Agent, EngineSettings};
//!
//! # async fn example(backend: std::sync::Arc<dyn agent_engine::Backend>) -> Result<(), agent_engine::Error> {
//! let settings = EngineSettings::load("agent.json")
//!     .await?
//!     .merge(EngineSettings::from_env("AGENT_")?);
//! let agent = settings.apply(Agent::builder().backend(backend)).build()?;
//! # Ok(())
//! # }
//! ```

mod settings;

pub use settings::EngineSettings;

use thiserror::Error;

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The key with invalid value
        key: String,
        /// Error message
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

//! Policy error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a cache policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A ttl or sttl could not be turned into whole seconds.
    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No policy with this name exists in the configuration.
    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    /// The policy configuration could not be parsed.
    #[error("Invalid policy configuration: {0}")]
    Config(String),

    /// The policy configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for PolicyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

//! Decoration error types

use thiserror::Error;

/// Errors surfaced to the application
///
/// Capability gaps, geometry hiccups and unsupported shaping never show up
/// here; they degrade and get logged. These variants cover API misuse only.
#[derive(Error, Debug)]
pub enum DecorError {
    /// Handle does not refer to a registered window
    #[error("Unknown decorated window")]
    UnknownWindow,

    /// Process-wide state was already initialized
    #[error("{0} is already initialized")]
    AlreadyInitialized(&'static str),

    /// Malformed configuration
    #[error("Invalid decoration config: {0}")]
    Config(String),
}

impl From<toml::de::Error> for DecorError {
    fn from(err: toml::de::Error) -> Self {
        DecorError::Config(err.to_string())
    }
}

/// Result type for decoration operations
pub type Result<T> = std::result::Result<T, DecorError>;

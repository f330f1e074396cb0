//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The operation is not supported by this platform or runtime
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    /// A platform facility exists but could not be reached right now
    #[error("Platform facility not available: {0}")]
    Unavailable(String),

    /// The native window backing a handle no longer exists
    #[error("Window is gone")]
    WindowGone,

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

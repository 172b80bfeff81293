//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Checkpoint names a state the machine does not define
    #[error("Checkpoint refers to unknown state '{0}'")]
    UnknownState(String),

    /// Checkpoint names a condition no guard of the machine uses
    #[error("Checkpoint refers to unknown condition '{0}'")]
    UnknownCondition(String),

    /// Checkpoint data is inconsistent
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}

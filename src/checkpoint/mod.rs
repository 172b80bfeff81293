//! Checkpoint and resume of a running machine.
//!
//! A checkpoint captures runtime state only: lifecycle phase, current,
//! previous and next state names, time in state, condition values and, if enabled,
//! the transition history. States, guards and callbacks are not captured, so
//! a checkpoint can only be restored into a machine built from the same
//! definition. See [`Machine::checkpoint`](crate::Machine::checkpoint) and
//! [`Machine::restore`](crate::Machine::restore).

use crate::core::TransitionHistory;
use crate::machine::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Saved values of one condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSnapshot {
    pub name: String,
    pub set: bool,
    pub pulse: bool,
}

/// Serializable snapshot of a machine's runtime state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub phase: Phase,

    pub current_state: Option<String>,

    pub previous_state: Option<String>,

    /// Target of the most recent transition
    pub next_state: Option<String>,

    pub time_in_state: f32,

    pub conditions: Vec<ConditionSnapshot>,

    /// Transition history, when the machine records one
    pub history: Option<TransitionHistory>,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}

//! Errors raised while defining or starting a machine.

use crate::guard::GuardError;
use thiserror::Error;

/// A rejected definition. The machine is left unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Unknown state '{name}'")]
    UnknownState { name: String },

    #[error("State '{name}' is already defined")]
    DuplicateState { name: String },

    #[error("State name '{name}' is reserved for wildcard transitions")]
    ReservedName { name: String },

    #[error("Invalid guard '{guard}': {source}")]
    InvalidGuard {
        guard: String,
        #[source]
        source: GuardError,
    },

    #[error("States cannot be added once the machine has begun")]
    AlreadyRunning,
}

/// Lifecycle misuse reported by [`Machine::begin`](super::Machine::begin).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("Machine has no states to begin in")]
    NoStates,

    #[error("Machine has already begun")]
    AlreadyStarted,
}

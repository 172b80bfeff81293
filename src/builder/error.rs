//! Build errors for the machine builder.

use crate::machine::DefinitionError;
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("Machine definition has {} invalid entries: {}", .0.len(), join(.0))]
    Invalid(Vec<DefinitionError>),
}

impl BuildError {
    /// Individual definition errors, in definition order.
    pub fn errors(&self) -> &[DefinitionError] {
        match self {
            Self::NoStates => &[],
            Self::Invalid(errors) => errors,
        }
    }
}

fn join(errors: &[DefinitionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

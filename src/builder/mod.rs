//! Builder API for validated machine construction.
//!
//! [`Machine`](crate::Machine) itself accepts definitions one at a time and
//! drops the ones it rejects. The builder collects a whole definition first
//! and refuses to produce a machine unless every state and transition is
//! accepted, reporting all failures together.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;

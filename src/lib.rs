//! Guardfsm: a tick-driven finite state machine with guard expressions
//!
//! Transitions are guarded by small boolean expressions over named
//! conditions, compiled once when the machine is defined and evaluated every
//! tick by the host loop.
//!
//! # Core Concepts
//!
//! - **Conditions**: named flags with a persistent `set` value and a
//!   one-shot `pulse` that lasts a single evaluation
//! - **Guards**: expressions such as `ready & !(blocked | paused)`; `&` and
//!   `|` share one binding level and take everything to their right
//! - **Decision states**: routing states passed through within a single
//!   evaluation, bounded by a configurable depth
//! - **Lifecycle**: `begin`, `evaluate`, `tick`, `draw` and `end`, each
//!   invoking the current state's callbacks
//!
//! # Example
//!
//! ```rust
//! use guardfsm::Machine;
//!
//! let mut machine = Machine::new();
//! machine.add_state("A").unwrap();
//! machine.add_state("B").unwrap();
//! machine.add_transition("A", "B", "X & Y").unwrap();
//! machine.add_transition("B", "A", "Z").unwrap();
//!
//! machine.begin().unwrap();
//! machine.pulse_condition("X");
//! machine.set_condition("Y", true);
//! machine.evaluate();
//! assert_eq!(machine.current_state_name(), Some("B"));
//!
//! // The pulse on X is gone, Y stays set.
//! assert!(!machine.condition("X").unwrap().is_active());
//! assert!(machine.condition("Y").unwrap().is_active());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod guard;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder};
pub use crate::checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{Condition, StateHandle, StateId, TransitionHistory, TransitionRecord};
pub use crate::guard::{GuardError, LexError, ParseError};
pub use crate::machine::{
    DefinitionError, Machine, MachineConfig, MachineError, Phase, Resolution, ANY_STATE,
};

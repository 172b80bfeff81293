//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::StateHandle;
use crate::machine::{DefinitionError, Machine, MachineConfig, ANY_STATE};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Configure = Box<dyn for<'a> FnOnce(StateHandle<'a>) -> StateHandle<'a>>;

enum Definition {
    State {
        name: String,
        configure: Option<Configure>,
    },
    Transition {
        from: String,
        to: String,
        guard: String,
    },
}

impl Definition {
    fn apply(self, machine: &mut Machine) -> Result<(), DefinitionError> {
        match self {
            Self::State { name, configure } => {
                let handle = machine.add_state(&name)?;
                if let Some(configure) = configure {
                    configure(handle);
                }
                Ok(())
            }
            Self::Transition { from, to, guard } => {
                machine.add_transition(&from, &to, &guard).map(|_| ())
            }
        }
    }
}

/// Builder for constructing machines with a fluent API.
///
/// Definitions are applied in the order they were given, so a wildcard
/// transition only reaches the states declared before it. Unlike the
/// lenient [`Machine`] methods, [`build`](Self::build) fails if any
/// definition is rejected, and reports all of them.
///
/// # Example
///
/// ```rust
/// use guardfsm::MachineBuilder;
///
/// let mut machine = MachineBuilder::new()
///     .state("Patrol")
///     .decision("Assess")
///     .state("Chase")
///     .state("Flee")
///     .transition("Patrol", "Assess", "enemy_seen")
///     .transition("Assess", "Flee", "low_health")
///     .transition("Assess", "Chase", "")
///     .build()
///     .unwrap();
///
/// machine.begin().unwrap();
/// machine.pulse_condition("enemy_seen");
/// machine.evaluate();
/// assert_eq!(machine.current_state_name(), Some("Chase"));
/// ```
pub struct MachineBuilder {
    config: MachineConfig,
    definitions: Vec<Definition>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            definitions: Vec::new(),
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a state without callbacks.
    pub fn state(mut self, name: &str) -> Self {
        self.definitions.push(Definition::State {
            name: name.to_string(),
            configure: None,
        });
        self
    }

    /// Add a state and attach callbacks through its handle.
    pub fn state_with<F>(mut self, name: &str, configure: F) -> Self
    where
        F: for<'a> FnOnce(StateHandle<'a>) -> StateHandle<'a> + 'static,
    {
        self.definitions.push(Definition::State {
            name: name.to_string(),
            configure: Some(Box::new(configure)),
        });
        self
    }

    /// Add a decision state.
    pub fn decision(self, name: &str) -> Self {
        self.state_with(name, |handle| handle.mark_decision())
    }

    /// Add a guarded transition.
    pub fn transition(mut self, from: &str, to: &str, guard: &str) -> Self {
        self.definitions.push(Definition::Transition {
            from: from.to_string(),
            to: to.to_string(),
            guard: guard.to_string(),
        });
        self
    }

    /// Add a transition from every state declared so far.
    pub fn any_transition(self, to: &str, guard: &str) -> Self {
        self.transition(ANY_STATE, to, guard)
    }

    /// Build the machine.
    /// Returns every rejected definition if any fail.
    pub fn build(self) -> Result<Machine, BuildError> {
        let has_states = self
            .definitions
            .iter()
            .any(|d| matches!(d, Definition::State { .. }));
        if !has_states {
            return Err(BuildError::NoStates);
        }

        let mut machine = Machine::with_config(self.config);
        let mut checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = Vec::new();
        for definition in self.definitions {
            let check = match definition.apply(&mut machine) {
                Ok(()) => Validation::success(()),
                Err(err) => Validation::fail(err),
            };
            checks.push(check);
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(machine),
            Validation::Failure(errors) => {
                Err(BuildError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! The machine driver.
//!
//! A [`Machine`] owns its conditions, compiled guards and states. It is
//! defined first (states, transitions, callbacks) and then driven by the host
//! loop, typically once per frame:
//!
//! ```rust
//! use guardfsm::Machine;
//!
//! let mut machine = Machine::new();
//! machine.add_state("Closed").unwrap();
//! machine.add_state("Open").unwrap();
//! machine.add_transition("Closed", "Open", "push & !locked").unwrap();
//! machine.add_transition("Open", "Closed", "timeout").unwrap();
//!
//! machine.begin().unwrap();
//! machine.pulse_condition("push");
//! machine.evaluate();
//! machine.tick(0.016);
//!
//! assert_eq!(machine.current_state_name(), Some("Open"));
//! ```

mod config;
mod error;

pub use config::{MachineConfig, DEFAULT_MAX_DECISION_DEPTH};
pub use error::{DefinitionError, MachineError};

use crate::checkpoint::{Checkpoint, CheckpointError, ConditionSnapshot, CHECKPOINT_VERSION};
use crate::core::{
    Condition, ConditionTable, ExprPool, State, StateHandle, StateId, Transition,
    TransitionHistory, TransitionRecord,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Source name that attaches a transition to every state defined so far.
pub const ANY_STATE: &str = "*";

/// Lifecycle phase of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Being defined; `begin` has not run
    Unstarted,
    /// Driven by `evaluate` and `tick`
    Running,
    /// `end` has run
    Ended,
}

/// Outcome of one [`Machine::evaluate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Commits into decision states made while chasing
    pub decision_hops: usize,
    /// Whether a final transition was committed after the chase
    pub settled: bool,
    /// Whether the chase stopped on the depth bound
    pub depth_exhausted: bool,
}

impl Resolution {
    /// Total number of committed transitions.
    pub fn transitions(&self) -> usize {
        self.decision_hops + usize::from(self.settled)
    }

    pub fn changed(&self) -> bool {
        self.transitions() > 0
    }
}

/// Finite state machine with guard-expression transitions.
#[derive(Debug)]
pub struct Machine {
    config: MachineConfig,
    conditions: ConditionTable,
    expressions: ExprPool,
    states: Vec<State>,
    phase: Phase,
    current: Option<StateId>,
    previous: Option<StateId>,
    next: Option<StateId>,
    time_in_state: f32,
    history: Option<TransitionHistory>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let history = empty_history(&config);

        Self {
            config,
            conditions: ConditionTable::new(),
            expressions: ExprPool::new(),
            states: Vec::new(),
            phase: Phase::Unstarted,
            current: None,
            previous: None,
            next: None,
            time_in_state: 0.0,
            history,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register a state. The first state added is the initial state.
    pub fn add_state(&mut self, name: &str) -> Result<StateHandle<'_>, DefinitionError> {
        if self.phase != Phase::Unstarted {
            warn!(state = name, "rejected state added after begin");
            return Err(DefinitionError::AlreadyRunning);
        }
        if name == ANY_STATE {
            warn!(state = name, "rejected reserved state name");
            return Err(DefinitionError::ReservedName {
                name: name.to_string(),
            });
        }
        if self.state_id(name).is_some() {
            warn!(state = name, "rejected duplicate state");
            return Err(DefinitionError::DuplicateState {
                name: name.to_string(),
            });
        }

        let id = StateId(self.states.len());
        self.states.push(State::new(name));
        if self.current.is_none() {
            self.current = Some(id);
        }
        Ok(StateHandle::new(id, &mut self.states[id.0]))
    }

    /// Reopen a state to change its callbacks or decision flag.
    pub fn state_mut(&mut self, name: &str) -> Option<StateHandle<'_>> {
        let id = self.state_id(name)?;
        Some(StateHandle::new(id, &mut self.states[id.0]))
    }

    /// Compile `guard` and append a transition from `from` to `to`.
    ///
    /// With `from` set to [`ANY_STATE`] the transition is appended to every
    /// state defined so far; later states do not receive it. An empty guard
    /// always holds. Returns how many states received the transition.
    ///
    /// On error the machine is unchanged apart from condition names already
    /// interned by the tokenizer, so ignoring the result simply drops the
    /// transition.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        guard: &str,
    ) -> Result<usize, DefinitionError> {
        self.try_add_transition(from, to, guard).inspect_err(|err| {
            warn!(from, to, guard, error = %err, "dropped transition");
        })
    }

    fn try_add_transition(
        &mut self,
        from: &str,
        to: &str,
        guard: &str,
    ) -> Result<usize, DefinitionError> {
        let target = self.require_state(to)?;
        let sources: Vec<StateId> = if from == ANY_STATE {
            (0..self.states.len()).map(StateId).collect()
        } else {
            vec![self.require_state(from)?]
        };

        let guard_id = crate::guard::compile(guard, &mut self.conditions, &mut self.expressions)
            .map_err(|source| DefinitionError::InvalidGuard {
                guard: guard.to_string(),
                source,
            })?
            .unwrap_or_else(|| self.expressions.always());

        for source in &sources {
            self.states[source.0].push_transition(Transition {
                guard: guard_id,
                target,
            });
        }
        Ok(sources.len())
    }

    fn require_state(&self, name: &str) -> Result<StateId, DefinitionError> {
        self.state_id(name)
            .ok_or_else(|| DefinitionError::UnknownState {
                name: name.to_string(),
            })
    }

    /// Set the persistent value of a condition. Returns false if no guard
    /// mentions `name`.
    pub fn set_condition(&mut self, name: &str, value: bool) -> bool {
        match self.conditions.lookup(name) {
            Some(id) => {
                self.conditions.set(id, value);
                true
            }
            None => {
                trace!(condition = name, "ignored unknown condition");
                false
            }
        }
    }

    /// Raise a condition for the next evaluation only. Returns false if no
    /// guard mentions `name`.
    pub fn pulse_condition(&mut self, name: &str) -> bool {
        match self.conditions.lookup(name) {
            Some(id) => {
                self.conditions.pulse(id);
                true
            }
            None => {
                trace!(condition = name, "ignored unknown condition");
                false
            }
        }
    }

    pub fn clear_all_conditions(&mut self) {
        self.conditions.clear_all();
    }

    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.by_name(name)
    }

    pub fn conditions(&self) -> &ConditionTable {
        &self.conditions
    }

    pub fn expressions(&self) -> &ExprPool {
        &self.expressions
    }

    /// Enter the first defined state.
    pub fn begin(&mut self) -> Result<(), MachineError> {
        if self.phase != Phase::Unstarted {
            return Err(MachineError::AlreadyStarted);
        }
        if self.states.is_empty() {
            return Err(MachineError::NoStates);
        }

        let initial = StateId(0);
        self.current = Some(initial);
        self.time_in_state = 0.0;
        self.phase = Phase::Running;
        debug!(state = self.states[initial.0].name(), "machine begun");
        self.states[initial.0].enter();
        Ok(())
    }

    /// Run the current state's exit callback. Calling again re-runs it.
    pub fn end(&mut self) {
        if self.phase == Phase::Unstarted {
            trace!("end ignored before begin");
            return;
        }
        if let Some(current) = self.current {
            debug!(state = self.states[current.0].name(), "machine ended");
            self.states[current.0].exit();
        }
        self.phase = Phase::Ended;
    }

    /// Run the current state's tick callback, then advance `time_in_state`.
    pub fn tick(&mut self, dt: f32) {
        if self.phase != Phase::Running {
            trace!(phase = ?self.phase, "tick ignored");
            return;
        }
        if let Some(current) = self.current {
            self.states[current.0].tick(dt);
        }
        self.time_in_state += dt;
    }

    /// Run the current state's draw callback.
    pub fn draw(&mut self) {
        if self.phase == Phase::Unstarted {
            return;
        }
        if let Some(current) = self.current {
            self.states[current.0].draw();
        }
    }

    /// Resolve transitions for this tick.
    ///
    /// The first transition of the current state whose guard holds is the
    /// candidate. While the candidate is a decision state it is entered
    /// immediately and the search repeats from there, at most
    /// `max_decision_depth` times. Pulses are then cleared, once, and any
    /// remaining candidate is committed. Pulses raised before the call are
    /// therefore visible to every guard tested during the chase.
    pub fn evaluate(&mut self) -> Resolution {
        let mut resolution = Resolution::default();
        if self.phase != Phase::Running {
            trace!(phase = ?self.phase, "evaluate ignored");
            return resolution;
        }

        let mut candidate = self.find_candidate();
        while let Some(target) = candidate {
            if !self.states[target.0].is_decision() {
                break;
            }
            if resolution.decision_hops >= self.config.max_decision_depth {
                resolution.depth_exhausted = true;
                warn!(
                    state = self.states[target.0].name(),
                    depth = self.config.max_decision_depth,
                    "decision chase hit depth bound"
                );
                break;
            }
            self.commit(target);
            resolution.decision_hops += 1;
            candidate = self.find_candidate();
        }

        self.conditions.clear_pulses();

        if let Some(target) = candidate {
            self.commit(target);
            resolution.settled = true;
        }
        resolution
    }

    fn find_candidate(&self) -> Option<StateId> {
        let current = self.states.get(self.current?.0)?;
        current
            .transitions()
            .iter()
            .find(|t| self.expressions.evaluate(t.guard, &self.conditions))
            .map(|t| t.target)
    }

    fn commit(&mut self, target: StateId) {
        let Some(from) = self.current else {
            return;
        };
        self.previous = Some(from);
        self.next = Some(target);

        self.states[from.0].exit();
        let time_in_state = self.time_in_state;
        self.current = Some(target);
        self.states[target.0].enter();
        self.time_in_state = 0.0;

        let from_name = self.states[from.0].name();
        let to_name = self.states[target.0].name();
        let via_decision = self.states[target.0].is_decision();
        if self.config.trace_transitions {
            info!(from = from_name, to = to_name, decision = via_decision, "transition");
        } else {
            debug!(from = from_name, to = to_name, decision = via_decision, "transition");
        }

        if let Some(history) = self.history.as_mut() {
            history.record(TransitionRecord {
                from: from_name.to_string(),
                to: to_name.to_string(),
                timestamp: Utc::now(),
                time_in_state,
                via_decision,
            });
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current.and_then(|id| self.state_name(id))
    }

    /// State left by the most recent transition.
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    /// Target of the most recent transition.
    pub fn next_state(&self) -> Option<StateId> {
        self.next
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name() == name)
            .map(StateId)
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.state(id).map(State::name)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Recorded transitions, if history is enabled in the config.
    pub fn history(&self) -> Option<&TransitionHistory> {
        self.history.as_ref()
    }

    /// Capture the runtime state: phase, current state, timers and
    /// condition values. The definition itself is not captured.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            phase: self.phase,
            current_state: self.current_state_name().map(str::to_string),
            previous_state: self
                .previous
                .and_then(|id| self.state_name(id))
                .map(str::to_string),
            next_state: self
                .next
                .and_then(|id| self.state_name(id))
                .map(str::to_string),
            time_in_state: self.time_in_state,
            conditions: self
                .conditions
                .iter()
                .map(|c| ConditionSnapshot {
                    name: c.name().to_string(),
                    set: c.is_set(),
                    pulse: c.is_pulsed(),
                })
                .collect(),
            history: self.history.clone(),
        }
    }

    /// Apply a checkpoint taken from a machine with the same definition.
    ///
    /// Everything is validated before anything changes. Callbacks are not
    /// invoked. Conditions missing from the checkpoint are cleared.
    pub fn restore(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let lookup = |name: &Option<String>| -> Result<Option<StateId>, CheckpointError> {
            name.as_deref()
                .map(|n| {
                    self.state_id(n)
                        .ok_or_else(|| CheckpointError::UnknownState(n.to_string()))
                })
                .transpose()
        };
        let current = lookup(&checkpoint.current_state)?;
        let previous = lookup(&checkpoint.previous_state)?;
        let next = lookup(&checkpoint.next_state)?;

        if checkpoint.phase != Phase::Unstarted && current.is_none() {
            return Err(CheckpointError::ValidationFailed(format!(
                "phase {:?} requires a current state",
                checkpoint.phase
            )));
        }

        let values = checkpoint
            .conditions
            .iter()
            .map(|snapshot| {
                self.conditions
                    .lookup(&snapshot.name)
                    .map(|id| (id, snapshot.set, snapshot.pulse))
                    .ok_or_else(|| CheckpointError::UnknownCondition(snapshot.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.conditions.clear_all();
        for (id, set, pulse) in values {
            self.conditions.restore(id, set, pulse);
        }

        self.phase = checkpoint.phase;
        self.current = current.or(self.current);
        self.previous = previous;
        self.next = next;
        self.time_in_state = checkpoint.time_in_state;
        if self.history.is_some() {
            self.history = match &checkpoint.history {
                Some(history) => Some(history.clone()),
                None => empty_history(&self.config),
            };
        }

        debug!(
            checkpoint = %checkpoint.id,
            state = ?checkpoint.current_state,
            "machine restored"
        );
        Ok(())
    }
}

fn empty_history(config: &MachineConfig) -> Option<TransitionHistory> {
    config.record_history.then(|| match config.history_limit {
        Some(limit) => TransitionHistory::with_limit(limit),
        None => TransitionHistory::new(),
    })
}

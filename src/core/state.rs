//! States, their guarded transitions and lifecycle callbacks.

use super::expression::ExprId;
use std::fmt;

/// Dense index of a state inside its machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Callback invoked on enter, exit and draw.
pub type Action = Box<dyn FnMut()>;

/// Callback invoked on every tick with the elapsed time.
pub type TickAction = Box<dyn FnMut(f32)>;

/// A guarded edge to another state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub guard: ExprId,
    pub target: StateId,
}

/// A named state.
///
/// Transitions are tested in insertion order and the first one whose guard
/// holds wins. A state marked as a decision is passed through within a single
/// evaluation instead of waiting for the next one.
pub struct State {
    name: String,
    transitions: Vec<Transition>,
    on_enter: Option<Action>,
    on_exit: Option<Action>,
    on_tick: Option<TickAction>,
    on_draw: Option<Action>,
    decision: bool,
}

impl State {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transitions: Vec::new(),
            on_enter: None,
            on_exit: None,
            on_tick: None,
            on_draw: None,
            decision: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn is_decision(&self) -> bool {
        self.decision
    }

    pub(crate) fn push_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub(crate) fn enter(&mut self) {
        if let Some(action) = self.on_enter.as_mut() {
            action();
        }
    }

    pub(crate) fn exit(&mut self) {
        if let Some(action) = self.on_exit.as_mut() {
            action();
        }
    }

    pub(crate) fn tick(&mut self, dt: f32) {
        if let Some(action) = self.on_tick.as_mut() {
            action(dt);
        }
    }

    pub(crate) fn draw(&mut self) {
        if let Some(action) = self.on_draw.as_mut() {
            action();
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("transitions", &self.transitions)
            .field("decision", &self.decision)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("on_tick", &self.on_tick.is_some())
            .field("on_draw", &self.on_draw.is_some())
            .finish()
    }
}

/// Mutable view of a state used to attach callbacks while defining a machine.
///
/// Setters return the handle so calls can be chained.
///
/// # Example
///
/// ```rust
/// use guardfsm::Machine;
///
/// let mut machine = Machine::new();
/// machine
///     .add_state("Idle")
///     .unwrap()
///     .on_enter(|| println!("idle"))
///     .on_tick(|dt| println!("idle for {dt}"));
/// machine.add_state("Route").unwrap().mark_decision();
/// ```
pub struct StateHandle<'a> {
    id: StateId,
    state: &'a mut State,
}

impl<'a> StateHandle<'a> {
    pub(crate) fn new(id: StateId, state: &'a mut State) -> Self {
        Self { id, state }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn on_enter<F>(self, action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.state.on_enter = Some(Box::new(action));
        self
    }

    pub fn on_exit<F>(self, action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.state.on_exit = Some(Box::new(action));
        self
    }

    pub fn on_tick<F>(self, action: F) -> Self
    where
        F: FnMut(f32) + 'static,
    {
        self.state.on_tick = Some(Box::new(action));
        self
    }

    pub fn on_draw<F>(self, action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.state.on_draw = Some(Box::new(action));
        self
    }

    /// Flag the state as a zero-duration routing node.
    pub fn mark_decision(self) -> Self {
        self.state.decision = true;
        self
    }
}

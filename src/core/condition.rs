//! Named boolean conditions referenced by guard expressions.
//!
//! A condition has two truth sources: a persistent `set` flag that stays
//! until changed, and a one-shot `pulse` flag that the machine clears at the
//! end of every evaluation pass.

use serde::{Deserialize, Serialize};

/// Dense index of a condition inside a [`ConditionTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConditionId(pub(crate) usize);

impl ConditionId {
    /// Position of the condition in its table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named flag with persistent and one-shot truth values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    name: String,
    set: bool,
    pulse: bool,
}

impl Condition {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            set: false,
            pulse: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn is_pulsed(&self) -> bool {
        self.pulse
    }

    /// Truth value as seen by guards: `set || pulse`.
    pub fn is_active(&self) -> bool {
        self.set || self.pulse
    }
}

/// Interned set of conditions owned by one machine.
///
/// Lookup is by exact, case-sensitive name. Conditions are only ever added,
/// so a [`ConditionId`] stays valid for the lifetime of the table.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::ConditionTable;
///
/// let mut table = ConditionTable::new();
/// let open = table.intern("door_open");
/// assert_eq!(table.intern("door_open"), open);
///
/// table.pulse(open);
/// assert!(table.is_active(open));
/// table.clear_pulses();
/// assert!(!table.is_active(open));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConditionTable {
    conditions: Vec<Condition>,
}

impl ConditionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, allocating a fresh condition on first sight.
    pub fn intern(&mut self, name: &str) -> ConditionId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        self.conditions.push(Condition::new(name));
        ConditionId(self.conditions.len() - 1)
    }

    pub fn lookup(&self, name: &str) -> Option<ConditionId> {
        self.conditions
            .iter()
            .position(|c| c.name == name)
            .map(ConditionId)
    }

    pub fn get(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Condition> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    /// Guard truth of `id`. Unknown ids read as false.
    pub fn is_active(&self, id: ConditionId) -> bool {
        self.get(id).is_some_and(Condition::is_active)
    }

    pub fn set(&mut self, id: ConditionId, value: bool) {
        if let Some(condition) = self.conditions.get_mut(id.0) {
            condition.set = value;
        }
    }

    pub fn pulse(&mut self, id: ConditionId) {
        if let Some(condition) = self.conditions.get_mut(id.0) {
            condition.pulse = true;
        }
    }

    pub(crate) fn restore(&mut self, id: ConditionId, set: bool, pulse: bool) {
        if let Some(condition) = self.conditions.get_mut(id.0) {
            condition.set = set;
            condition.pulse = pulse;
        }
    }

    /// Drop every pending pulse, leaving `set` values untouched.
    pub fn clear_pulses(&mut self) {
        for condition in &mut self.conditions {
            condition.pulse = false;
        }
    }

    /// Reset both `set` and `pulse` on every condition.
    pub fn clear_all(&mut self) {
        for condition in &mut self.conditions {
            condition.set = false;
            condition.pulse = false;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_returns_same_id_for_same_name() {
        let mut table = ConditionTable::new();
        let a = table.intern("A");
        let b = table.intern("B");

        assert_ne!(a, b);
        assert_eq!(table.intern("A"), a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut table = ConditionTable::new();
        table.intern("Ready");

        assert!(table.lookup("Ready").is_some());
        assert!(table.lookup("ready").is_none());
    }

    #[test]
    fn active_is_set_or_pulse() {
        let mut table = ConditionTable::new();
        let id = table.intern("X");
        assert!(!table.is_active(id));

        table.set(id, true);
        assert!(table.is_active(id));

        table.set(id, false);
        table.pulse(id);
        assert!(table.is_active(id));
    }

    #[test]
    fn clear_pulses_keeps_set_values() {
        let mut table = ConditionTable::new();
        let held = table.intern("held");
        let flash = table.intern("flash");
        table.set(held, true);
        table.pulse(flash);

        table.clear_pulses();

        assert!(table.is_active(held));
        assert!(!table.is_active(flash));
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut table = ConditionTable::new();
        let a = table.intern("A");
        table.set(a, true);
        table.pulse(a);

        table.clear_all();

        let condition = table.get(a).unwrap();
        assert!(!condition.is_set());
        assert!(!condition.is_pulsed());
    }

    #[test]
    fn unknown_id_reads_false() {
        let table = ConditionTable::new();
        assert!(!table.is_active(ConditionId(3)));
    }
}

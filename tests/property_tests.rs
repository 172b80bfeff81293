//! Property-based tests for guard compilation and transition resolution.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use guardfsm::core::{ConditionTable, ExprPool};
use guardfsm::guard::{compile, GuardError};
use guardfsm::{Machine, ANY_STATE};
use proptest::prelude::*;

prop_compose! {
    /// Operands as (negated, value) pairs plus one operator flag per gap
    /// (`true` for `&`).
    fn flat_guard()(
        operands in prop::collection::vec((any::<bool>(), any::<bool>()), 1..8),
        ops in prop::collection::vec(any::<bool>(), 7),
    ) -> (Vec<(bool, bool)>, Vec<bool>) {
        let gaps = operands.len() - 1;
        (operands, ops[..gaps].to_vec())
    }
}

fn render_flat(operands: &[(bool, bool)], ops: &[bool]) -> String {
    let mut source = String::new();
    for (i, (negated, _)) in operands.iter().enumerate() {
        if *negated {
            source.push('!');
        }
        source.push_str(&format!("C{i}"));
        if let Some(is_and) = ops.get(i) {
            source.push_str(if *is_and { " & " } else { " | " });
        }
    }
    source
}

fn right_grouped(operands: &[(bool, bool)], ops: &[bool]) -> bool {
    let value = |i: usize| operands[i].0 ^ operands[i].1;
    let mut acc = value(operands.len() - 1);
    for i in (0..operands.len() - 1).rev() {
        acc = if ops[i] { value(i) && acc } else { value(i) || acc };
    }
    acc
}

fn decision_chain(length: usize, guard: &str) -> Machine {
    let mut machine = Machine::new();
    machine.add_state("Start").unwrap();
    for i in 1..=length {
        machine.add_state(&format!("D{i}")).unwrap().mark_decision();
    }
    machine.add_state("End").unwrap();

    machine.add_transition("Start", "D1", guard).unwrap();
    for i in 1..length {
        machine
            .add_transition(&format!("D{i}"), &format!("D{}", i + 1), guard)
            .unwrap();
    }
    machine
        .add_transition(&format!("D{length}"), "End", guard)
        .unwrap();
    machine
}

proptest! {
    #[test]
    fn operators_group_everything_to_their_right((operands, ops) in flat_guard()) {
        let source = render_flat(&operands, &ops);
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let root = compile(&source, &mut conditions, &mut pool).unwrap().unwrap();

        for (i, (_, value)) in operands.iter().enumerate() {
            let id = conditions.lookup(&format!("C{i}")).unwrap();
            conditions.set(id, *value);
        }

        prop_assert_eq!(pool.evaluate(root, &conditions), right_grouped(&operands, &ops));
    }

    #[test]
    fn guard_soup_parses_or_fails_cleanly(source in "[ABC!&|() ]{0,20}") {
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();

        match compile(&source, &mut conditions, &mut pool) {
            Ok(None) => prop_assert!(source.trim().is_empty()),
            Ok(Some(root)) => {
                prop_assert!(!source.trim().is_empty());
                let _ = pool.evaluate(root, &conditions);
            }
            Err(GuardError::Parse(_)) => prop_assert!(pool.is_empty()),
            Err(GuardError::Lex(err)) => prop_assert!(false, "unexpected lex error {}", err),
        }
    }

    #[test]
    fn double_negation_is_identity(value in any::<bool>(), pulsed in any::<bool>()) {
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let plain = compile("X", &mut conditions, &mut pool).unwrap().unwrap();
        let doubled = compile("!!X", &mut conditions, &mut pool).unwrap().unwrap();
        let grouped = compile("!(!X)", &mut conditions, &mut pool).unwrap().unwrap();

        let id = conditions.lookup("X").unwrap();
        conditions.set(id, value);
        if pulsed {
            conditions.pulse(id);
        }

        let expected = pool.evaluate(plain, &conditions);
        prop_assert_eq!(pool.evaluate(doubled, &conditions), expected);
        prop_assert_eq!(pool.evaluate(grouped, &conditions), expected);
    }

    #[test]
    fn pulse_is_seen_through_the_whole_chase(length in 1usize..=10) {
        let mut machine = decision_chain(length, "P");
        machine.add_transition("End", "Start", "P").unwrap();
        machine.begin().unwrap();

        machine.pulse_condition("P");
        let resolution = machine.evaluate();
        prop_assert_eq!(resolution.decision_hops, length);
        prop_assert_eq!(machine.current_state_name(), Some("End"));
        prop_assert!(!machine.condition("P").unwrap().is_active());

        prop_assert!(!machine.evaluate().changed());
        prop_assert_eq!(machine.current_state_name(), Some("End"));
    }

    #[test]
    fn decision_chase_is_bounded(length in 1usize..30) {
        let mut machine = decision_chain(length, "");
        machine.begin().unwrap();

        let resolution = machine.evaluate();
        prop_assert_eq!(resolution.decision_hops, length.min(10));
        prop_assert!(resolution.settled);

        if length <= 10 {
            prop_assert!(!resolution.depth_exhausted);
            prop_assert_eq!(machine.current_state_name(), Some("End"));
        } else {
            prop_assert!(resolution.depth_exhausted);
            prop_assert_eq!(machine.current_state_name(), Some("D11"));
            machine.evaluate();
            prop_assert_ne!(machine.current_state_name(), Some("D11"));
        }
    }

    #[test]
    fn wildcard_reaches_only_earlier_states(before in 1usize..6, after in 0usize..6) {
        let mut machine = Machine::new();
        for i in 0..before {
            machine.add_state(&format!("S{i}")).unwrap();
        }
        prop_assert_eq!(machine.add_transition(ANY_STATE, "S0", "reset").unwrap(), before);
        for i in before..before + after {
            machine.add_state(&format!("S{i}")).unwrap();
        }

        for (i, state) in machine.states().iter().enumerate() {
            let expected = usize::from(i < before);
            prop_assert_eq!(state.transitions().len(), expected);
        }
    }

    #[test]
    fn set_values_survive_evaluation(values in prop::collection::vec(any::<bool>(), 1..10)) {
        let mut machine = Machine::new();
        machine.add_state("Only").unwrap();
        machine.add_transition("Only", "Only", "flag & never").unwrap();
        machine.begin().unwrap();

        for value in values {
            machine.set_condition("flag", value);
            machine.evaluate();
            prop_assert_eq!(machine.condition("flag").unwrap().is_set(), value);
        }
    }
}

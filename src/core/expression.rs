//! Boolean expression nodes and their evaluator.
//!
//! Guards compile into nodes stored in a single [`ExprPool`] per machine.
//! Nodes refer to each other by [`ExprId`], so the pool forms a DAG that is
//! built once at definition time and only read afterwards. Structurally
//! identical nodes are not merged.

use super::condition::{ConditionId, ConditionTable};

/// Index of a node inside an [`ExprPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single guard expression node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Always true. Used for unconditional transitions.
    True,
    Not(ExprId),
    Condition(ConditionId),
    And(ExprId, ExprId),
    Or(ExprId, ExprId),
}

/// Append-only storage for expression nodes.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::{ConditionTable, ExprPool};
///
/// let mut conditions = ConditionTable::new();
/// let mut pool = ExprPool::new();
///
/// let a = pool.condition(conditions.intern("A"));
/// let not_a = pool.not(a);
///
/// assert!(pool.evaluate(not_a, &conditions));
/// conditions.set(conditions.lookup("A").unwrap(), true);
/// assert!(!pool.evaluate(not_a, &conditions));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExprPool {
    nodes: Vec<Expr>,
}

impl ExprPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, expr: Expr) -> ExprId {
        self.nodes.push(expr);
        ExprId(self.nodes.len() - 1)
    }

    pub fn always(&mut self) -> ExprId {
        self.push(Expr::True)
    }

    pub fn not(&mut self, child: ExprId) -> ExprId {
        self.push(Expr::Not(child))
    }

    pub fn condition(&mut self, id: ConditionId) -> ExprId {
        self.push(Expr::Condition(id))
    }

    pub fn and(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.push(Expr::And(left, right))
    }

    pub fn or(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.push(Expr::Or(left, right))
    }

    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node appended after `len`. Used to undo a failed parse.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Evaluate `id` against the current condition values.
    ///
    /// Conjunction and disjunction short-circuit. An id that does not belong
    /// to this pool evaluates to false.
    pub fn evaluate(&self, id: ExprId, conditions: &ConditionTable) -> bool {
        match self.get(id) {
            Some(Expr::True) => true,
            Some(Expr::Not(child)) => !self.evaluate(*child, conditions),
            Some(Expr::Condition(condition)) => conditions.is_active(*condition),
            Some(Expr::And(left, right)) => {
                self.evaluate(*left, conditions) && self.evaluate(*right, conditions)
            }
            Some(Expr::Or(left, right)) => {
                self.evaluate(*left, conditions) || self.evaluate(*right, conditions)
            }
            None => false,
        }
    }

    /// Render the tree rooted at `id` in fully parenthesized prefix form,
    /// e.g. `and(A, or(B, C))`. Condition names come from `conditions`.
    pub fn render(&self, id: ExprId, conditions: &ConditionTable) -> String {
        match self.get(id) {
            Some(Expr::True) => "true".to_string(),
            Some(Expr::Not(child)) => format!("not({})", self.render(*child, conditions)),
            Some(Expr::Condition(condition)) => conditions
                .get(*condition)
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| format!("?{}", condition.index())),
            Some(Expr::And(left, right)) => format!(
                "and({}, {})",
                self.render(*left, conditions),
                self.render(*right, conditions)
            ),
            Some(Expr::Or(left, right)) => format!(
                "or({}, {})",
                self.render(*left, conditions),
                self.render(*right, conditions)
            ),
            None => "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ConditionTable, ExprPool, ExprId, ExprId) {
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let a = pool.condition(conditions.intern("A"));
        let b = pool.condition(conditions.intern("B"));
        (conditions, pool, a, b)
    }

    #[test]
    fn true_node_is_always_true() {
        let conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let t = pool.always();
        assert!(pool.evaluate(t, &conditions));
    }

    #[test]
    fn and_requires_both() {
        let (mut conditions, mut pool, a, b) = setup();
        let both = pool.and(a, b);

        conditions.set(conditions.lookup("A").unwrap(), true);
        assert!(!pool.evaluate(both, &conditions));

        conditions.pulse(conditions.lookup("B").unwrap());
        assert!(pool.evaluate(both, &conditions));
    }

    #[test]
    fn or_requires_either() {
        let (mut conditions, mut pool, a, b) = setup();
        let either = pool.or(a, b);
        assert!(!pool.evaluate(either, &conditions));

        conditions.set(conditions.lookup("B").unwrap(), true);
        assert!(pool.evaluate(either, &conditions));
    }

    #[test]
    fn double_negation_matches_operand() {
        let (mut conditions, mut pool, a, _) = setup();
        let inner = pool.not(a);
        let outer = pool.not(inner);
        let id = conditions.lookup("A").unwrap();

        for value in [false, true] {
            conditions.set(id, value);
            assert_eq!(pool.evaluate(outer, &conditions), value);
        }
    }

    #[test]
    fn identical_nodes_are_not_merged() {
        let (_, mut pool, a, b) = setup();
        let first = pool.and(a, b);
        let second = pool.and(a, b);
        assert_ne!(first, second);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn render_shows_grouping() {
        let (conditions, mut pool, a, b) = setup();
        let not_b = pool.not(b);
        let root = pool.or(a, not_b);
        assert_eq!(pool.render(root, &conditions), "or(A, not(B))");
    }
}

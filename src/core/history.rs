//! Record of committed transitions.
//!
//! The machine only records history when
//! [`MachineConfig::record_history`](crate::machine::MachineConfig) is
//! enabled. Records carry state names rather than ids so a history stays
//! readable after it has been serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single committed transition.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "Closed".to_string(),
///     to: "Open".to_string(),
///     timestamp: Utc::now(),
///     time_in_state: 2.5,
///     via_decision: false,
/// };
/// assert_eq!(record.to, "Open");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state that was left
    pub from: String,
    /// Name of the state that was entered
    pub to: String,
    /// Wall-clock time of the commit
    pub timestamp: DateTime<Utc>,
    /// Accumulated tick time spent in `from`
    pub time_in_state: f32,
    /// Whether the commit was a hop into a decision state
    pub via_decision: bool,
}

/// Ordered history of committed transitions, optionally bounded.
///
/// When a limit is set the oldest records are dropped first.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::new();
/// for (from, to) in [("A", "B"), ("B", "C")] {
///     history.record(TransitionRecord {
///         from: from.to_string(),
///         to: to.to_string(),
///         timestamp: Utc::now(),
///         time_in_state: 0.0,
///         via_decision: false,
///     });
/// }
///
/// assert_eq!(history.get_path(), vec!["A", "B", "C"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionHistory {
    transitions: Vec<TransitionRecord>,
    limit: Option<usize>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Append a record, evicting the oldest ones past the limit.
    pub fn record(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            if self.transitions.len() > limit {
                let excess = self.transitions.len() - limit;
                self.transitions.drain(..excess);
            }
        }
    }

    /// Names of the states traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Wall-clock time between the first and last record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

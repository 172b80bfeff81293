//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Default bound on decision-state hops within one evaluation.
pub const DEFAULT_MAX_DECISION_DEPTH: usize = 10;

/// Tunables for a [`Machine`](super::Machine).
///
/// Every field has a default, so partial JSON is accepted.
///
/// # Example
///
/// ```rust
/// use guardfsm::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "record_history": true }"#).unwrap();
/// assert!(config.record_history);
/// assert_eq!(config.max_decision_depth, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Maximum number of decision states chased in a single evaluation
    pub max_decision_depth: usize,

    /// Keep a [`TransitionHistory`](crate::core::TransitionHistory)
    pub record_history: bool,

    /// Bound on recorded transitions; `None` keeps everything
    pub history_limit: Option<usize>,

    /// Log committed transitions at `info` instead of `debug`
    pub trace_transitions: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_decision_depth: DEFAULT_MAX_DECISION_DEPTH,
            record_history: false,
            history_limit: None,
            trace_transitions: false,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_max_decision_depth(mut self, depth: usize) -> Self {
        self.max_decision_depth = depth;
        self
    }

    pub fn with_history(mut self, limit: Option<usize>) -> Self {
        self.record_history = true;
        self.history_limit = limit;
        self
    }

    pub fn with_trace_transitions(mut self, enabled: bool) -> Self {
        self.trace_transitions = enabled;
        self
    }
}

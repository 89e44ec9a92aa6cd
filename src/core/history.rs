//! State transition history tracking.
//!
//! Every transition a machine applies is recorded in order, including
//! the intermediate states of multi-hop routes and the `BAD_STATE`
//! landing of a recovery. The history is bounded; the oldest records are
//! dropped once the capacity is reached.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of records kept per machine.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// How a recorded transition came about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The edge was declared in the transition graph.
    Direct,
    /// Entered an intermediate state on the way to another.
    Hop,
    /// Part of a recovery from an illegal transition.
    Recovery,
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use smartstate::core::{StateId, StateTransition, TransitionKind};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: StateId::new(1),
///     to: StateId::new(2),
///     kind: TransitionKind::Direct,
///     tick: 12,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.kind, TransitionKind::Direct);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: StateId,
    /// The state being transitioned to
    pub to: StateId,
    pub kind: TransitionKind,
    /// Machine tick on which the transition was applied
    pub tick: u64,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use smartstate::core::{StateHistory, StateId, StateTransition, TransitionKind};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
/// for (from, to) in [(1, 2), (2, 3)] {
///     history.record(StateTransition {
///         from: StateId::new(from),
///         to: StateId::new(to),
///         kind: TransitionKind::Direct,
///         tick: 0,
///         timestamp: Utc::now(),
///     });
/// }
///
/// let path = history.get_path();
/// assert_eq!(path, vec![StateId::new(1), StateId::new(2), StateId::new(3)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: VecDeque<StateTransition>,
    capacity: usize,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    /// Create a new empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history that keeps at most `capacity` records.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest record when full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition, then
    /// the `to` state of each transition.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all retained transitions, oldest first.
    pub fn transitions(&self) -> &VecDeque<StateTransition> {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

//! State-change notifications and their history.
//!
//! Every Enter/Exit notification the machine emits is a [`StateChange`].
//! The machine keeps the most recent ones in a bounded [`StateHistory`].

use super::state::Hook;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Direction of a state-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// The named state was entered and its enter action ran
    Enter,
    /// The named state was left and its exit action ran
    Exit,
}

impl From<Transition> for Hook {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Enter => Hook::Enter,
            Transition::Exit => Hook::Exit,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Hook::from(*self), f)
    }
}

/// A single state-change notification.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{StateChange, Transition};
///
/// let change = StateChange::new("idle", Transition::Enter);
/// assert_eq!(change.state, "idle");
/// assert_eq!(change.transition, Transition::Enter);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    /// Name of the state entered or left
    pub state: String,
    /// Whether the state was entered or left
    pub transition: Transition,
    /// When the notification was emitted
    pub timestamp: DateTime<Utc>,
}

impl StateChange {
    /// Create a notification stamped with the current time.
    pub fn new(state: impl Into<String>, transition: Transition) -> Self {
        Self {
            state: state.into(),
            transition,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, ordered log of state-change notifications.
///
/// Once `limit` entries are stored, recording a new one evicts the oldest.
/// A limit of zero disables recording.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{StateChange, StateHistory, Transition};
///
/// let mut history = StateHistory::with_limit(2);
/// history.record(StateChange::new("a", Transition::Enter));
/// history.record(StateChange::new("a", Transition::Exit));
/// history.record(StateChange::new("b", Transition::Enter));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path(), vec!["b"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    limit: usize,
    changes: VecDeque<StateChange>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::with_limit(crate::runtime::DEFAULT_HISTORY_LIMIT)
    }
}

impl StateHistory {
    /// Create an empty history retaining at most `limit` notifications.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            changes: VecDeque::with_capacity(limit.min(crate::runtime::DEFAULT_HISTORY_LIMIT)),
        }
    }

    /// Append a notification, evicting the oldest if the log is full.
    pub fn record(&mut self, change: StateChange) {
        if self.limit == 0 {
            return;
        }
        while self.changes.len() >= self.limit {
            self.changes.pop_front();
        }
        self.changes.push_back(change);
    }

    /// Notifications in the order they were emitted.
    pub fn changes(&self) -> impl Iterator<Item = &StateChange> + '_ {
        self.changes.iter()
    }

    /// Names of the states entered, oldest first.
    ///
    /// Only Enter notifications contribute, so states without an enter
    /// action do not appear.
    pub fn path(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.transition == Transition::Enter)
            .map(|c| c.state.as_str())
            .collect()
    }

    /// Most recent notification.
    pub fn last(&self) -> Option<&StateChange> {
        self.changes.back()
    }

    /// Number of retained notifications.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether no notifications are retained.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Maximum number of retained notifications.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop all retained notifications, keeping the limit.
    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

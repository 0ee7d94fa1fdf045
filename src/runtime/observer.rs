//! Subscribers to state-change notifications.

use crate::core::StateChange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

type Callback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Ordered list of notification subscribers.
///
/// Subscribers are called synchronously in subscription order. Dispatch
/// works on a snapshot of the list, so the set of subscribers that sees a
/// notification is fixed when dispatch starts.
#[derive(Default)]
pub struct Observers {
    entries: Vec<(ObserverId, Callback)>,
}

impl Observers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber after all existing ones.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = ObserverId::new();
        self.entries.push((id, Arc::new(observer)));
        id
    }

    /// Remove a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `change` to every subscriber, in subscription order.
    pub fn dispatch(&self, change: &StateChange) {
        let snapshot: Vec<Callback> = self.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for observer in snapshot {
            tracing::trace!(state = %change.state, transition = %change.transition, "dispatching state change");
            observer(change);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

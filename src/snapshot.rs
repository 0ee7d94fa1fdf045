//! Serializable snapshots of a machine.
//!
//! A snapshot records what a machine looks like at a point in time:
//! which states are registered and which hooks they carry, the start and
//! current state, and the notification history. Actions are closures and
//! are not part of a snapshot, so snapshots are for inspection only.

use crate::core::StateHistory;
use crate::runtime::Machine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Which hooks a registered state carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    pub name: String,
    pub enter: bool,
    pub update: bool,
    pub exit: bool,
}

/// Point-in-time view of a [`Machine`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Registered states, sorted by name
    pub states: Vec<StateSummary>,

    pub start: Option<String>,

    pub current: Option<String>,

    /// Recent state-change notifications
    pub history: StateHistory,
}

impl MachineSnapshot {
    pub(crate) fn capture(machine: &Machine) -> Self {
        let mut states: Vec<StateSummary> = machine
            .states()
            .map(|state| StateSummary {
                name: state.name().to_string(),
                enter: state.has_enter(),
                update: state.has_update(),
                exit: state.has_exit(),
            })
            .collect();
        states.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            states,
            start: machine.start_state_name().map(str::to_string),
            current: machine.current_state_name().map(str::to_string),
            history: machine.history().clone(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

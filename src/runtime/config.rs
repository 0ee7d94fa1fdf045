//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Number of notifications a machine remembers unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// What happens when a state is registered under a name already in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `MachineError::DuplicateState`
    #[default]
    Reject,

    /// Overwrite the previous definition
    Replace,
}

/// Tunables for a [`Machine`](super::Machine).
///
/// # Example
///
/// ```rust
/// use tickfsm::runtime::{DuplicatePolicy, MachineConfig};
///
/// let config: MachineConfig =
///     serde_json::from_str(r#"{ "duplicates": "replace" }"#).unwrap();
///
/// assert_eq!(config.duplicates, DuplicatePolicy::Replace);
/// assert_eq!(config.history_limit, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// How registering an existing name is handled
    pub duplicates: DuplicatePolicy,

    /// Maximum retained notifications; zero disables history
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    /// Set the duplicate-name policy.
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Set the maximum number of retained notifications.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

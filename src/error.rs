//! Errors raised by state registration and machine operations.

use crate::core::Hook;
use thiserror::Error;

/// Error produced by a state action.
///
/// Actions are free to fail with any error type; the failure is boxed and
/// carried out of the machine unchanged inside [`MachineError::ActionFailed`].
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result returned by a state action.
pub type ActionResult = Result<(), ActionError>;

/// Broad category of a [`MachineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed registration (empty name, no actions, duplicate name)
    InvalidArgument,

    /// Absent name, or absent/unresolvable start state
    NullOrMissing,

    /// Operation attempted before the machine was initialized
    InvalidState,

    /// Transition target is not registered
    KeyNotFound,

    /// A state action returned an error
    ActionFailed,
}

/// Errors that can occur when registering states or driving a machine.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("State name not specified. Call .name(name) before .build()")]
    MissingName,

    #[error("State name cannot be empty")]
    EmptyName,

    #[error("State{} has no actions. Add at least one of enter, update or exit", .name.as_ref().map(|n| format!(" '{n}'")).unwrap_or_default())]
    NoActions { name: Option<String> },

    #[error("State '{name}' is already registered")]
    DuplicateState { name: String },

    #[error("Machine does not have a start state{}", .start.as_ref().map(|s| format!(" ('{s}' is not registered)")).unwrap_or_default())]
    NoStartState { start: Option<String> },

    #[error("State machine not initialized. Call tick() or reset() before to()")]
    NotInitialized,

    #[error("State '{name}' is not registered")]
    UnknownState { name: String },

    #[error("{hook} action of state '{state}' failed: {source}")]
    ActionFailed {
        state: String,
        hook: Hook,
        #[source]
        source: ActionError,
    },
}

impl MachineError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::NoActions { .. } | Self::DuplicateState { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::MissingName | Self::NoStartState { .. } => ErrorKind::NullOrMissing,
            Self::NotInitialized => ErrorKind::InvalidState,
            Self::UnknownState { .. } => ErrorKind::KeyNotFound,
            Self::ActionFailed { .. } => ErrorKind::ActionFailed,
        }
    }
}

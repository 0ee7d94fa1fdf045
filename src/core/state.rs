//! State definitions: a name plus up to three actions.
//!
//! A state is immutable once built. Its actions are boxed closures that the
//! machine invokes synchronously on the caller's thread.

use crate::builder::StateBuilder;
use crate::error::{ActionResult, MachineError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A boxed state action.
///
/// Actions take no arguments and report failure through [`ActionResult`].
pub type Action = Box<dyn FnMut() -> ActionResult + Send>;

/// The three points in a state's lifecycle where an action can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hook {
    /// Runs when the machine enters the state
    Enter,
    /// Runs once per tick while the state is current
    Update,
    /// Runs when the machine leaves the state
    Exit,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Enter => "enter",
            Self::Update => "update",
            Self::Exit => "exit",
        })
    }
}

/// A named state with optional enter, update and exit actions.
///
/// Build states with [`State::builder`] (or [`StateBuilder`] directly); the
/// builder rejects states without a name or without any action.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Hook, State};
///
/// let idle = State::builder("idle")
///     .on_update(|| println!("waiting"))
///     .build()
///     .unwrap();
///
/// assert_eq!(idle.name(), "idle");
/// assert!(idle.has_hook(Hook::Update));
/// assert!(!idle.has_enter());
/// ```
pub struct State {
    name: String,
    enter: Option<Action>,
    update: Option<Action>,
    exit: Option<Action>,
}

impl State {
    /// Start building a state with the given name.
    pub fn builder(name: impl Into<String>) -> StateBuilder {
        StateBuilder::new().name(name)
    }

    /// Validate and assemble a state.
    ///
    /// Checks run in order: no actions, empty name, missing name.
    pub(crate) fn new(
        name: Option<String>,
        enter: Option<Action>,
        update: Option<Action>,
        exit: Option<Action>,
    ) -> Result<Self, MachineError> {
        if enter.is_none() && update.is_none() && exit.is_none() {
            return Err(MachineError::NoActions { name });
        }
        let name = match name {
            Some(name) if name.is_empty() => return Err(MachineError::EmptyName),
            Some(name) => name,
            None => return Err(MachineError::MissingName),
        };

        Ok(Self {
            name,
            enter,
            update,
            exit,
        })
    }

    /// The state's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the state has an enter action.
    pub fn has_enter(&self) -> bool {
        self.enter.is_some()
    }

    /// Whether the state has an update action.
    pub fn has_update(&self) -> bool {
        self.update.is_some()
    }

    /// Whether the state has an exit action.
    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    /// Whether an action is registered for `hook`.
    pub fn has_hook(&self, hook: Hook) -> bool {
        match hook {
            Hook::Enter => self.has_enter(),
            Hook::Update => self.has_update(),
            Hook::Exit => self.has_exit(),
        }
    }

    /// Run the action for `hook`, if there is one.
    ///
    /// Returns `Ok(true)` when an action ran, `Ok(false)` when the slot is
    /// empty. A failing action is wrapped with the state name and hook.
    pub(crate) fn run(&mut self, hook: Hook) -> Result<bool, MachineError> {
        let slot = match hook {
            Hook::Enter => &mut self.enter,
            Hook::Update => &mut self.update,
            Hook::Exit => &mut self.exit,
        };

        let Some(action) = slot.as_mut() else {
            return Ok(false);
        };

        action().map_err(|source| {
            tracing::warn!(state = %self.name, %hook, error = %source, "state action failed");
            MachineError::ActionFailed {
                state: self.name.clone(),
                hook,
                source,
            }
        })?;

        Ok(true)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("enter", &self.has_enter())
            .field("update", &self.has_update())
            .field("exit", &self.has_exit())
            .finish()
    }
}

//! Builder for constructing states.

use crate::core::{Action, State};
use crate::error::{ActionResult, MachineError};

/// Builder for a [`State`] with a fluent API.
///
/// Infallible closures go through `on_enter`/`on_update`/`on_exit`;
/// closures that can fail go through the `try_` variants.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::StateBuilder;
///
/// let state = StateBuilder::new()
///     .name("loading")
///     .on_enter(|| println!("start loading"))
///     .try_on_update(|| Ok(()))
///     .build()
///     .unwrap();
///
/// assert!(state.has_enter());
/// assert!(state.has_update());
/// assert!(!state.has_exit());
/// ```
#[derive(Default)]
pub struct StateBuilder {
    name: Option<String>,
    enter: Option<Action>,
    update: Option<Action>,
    exit: Option<Action>,
}

impl StateBuilder {
    /// Create a new builder with no name and no actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state name (required, non-empty).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an infallible enter action.
    pub fn on_enter<F>(mut self, mut action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.enter = Some(Box::new(move || {
            action();
            Ok(())
        }));
        self
    }

    /// Set an infallible update action.
    pub fn on_update<F>(mut self, mut action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.update = Some(Box::new(move || {
            action();
            Ok(())
        }));
        self
    }

    /// Set an infallible exit action.
    pub fn on_exit<F>(mut self, mut action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.exit = Some(Box::new(move || {
            action();
            Ok(())
        }));
        self
    }

    /// Set a enter action that can fail.
    pub fn try_on_enter<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> ActionResult + Send + 'static,
    {
        self.enter = Some(Box::new(action));
        self
    }

    /// Set a update action that can fail.
    pub fn try_on_update<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> ActionResult + Send + 'static,
    {
        self.update = Some(Box::new(action));
        self
    }

    /// Set a exit action that can fail.
    pub fn try_on_exit<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> ActionResult + Send + 'static,
    {
        self.exit = Some(Box::new(action));
        self
    }

    /// Build the state.
    /// Returns an error if the name is missing or empty, or no action is set.
    pub fn build(self) -> Result<State, MachineError> {
        State::new(self.name, self.enter, self.update, self.exit)
    }
}

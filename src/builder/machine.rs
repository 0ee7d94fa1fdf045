//! Builder for constructing machines.

use crate::builder::state::StateBuilder;
use crate::error::MachineError;
use crate::runtime::{Machine, MachineConfig};

/// Builder for constructing a [`Machine`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use tickfsm::builder::{MachineBuilder, StateBuilder};
///
/// let machine = MachineBuilder::new()
///     .start(StateBuilder::new().name("idle").on_update(|| {}))
///     .state(StateBuilder::new().name("walk").on_enter(|| {}))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.start_state_name(), Some("idle"));
/// assert_eq!(machine.len(), 2);
/// ```
#[derive(Default)]
pub struct MachineBuilder {
    config: MachineConfig,
    states: Vec<(StateBuilder, bool)>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a state.
    pub fn state(mut self, builder: StateBuilder) -> Self {
        self.states.push((builder, false));
        self
    }

    /// Add a state and designate it the start state.
    pub fn start(mut self, builder: StateBuilder) -> Self {
        self.states.push((builder, true));
        self
    }

    /// Build the machine, registering states in the order they were added.
    /// Returns the first registration error.
    pub fn build(self) -> Result<Machine, MachineError> {
        let mut machine = Machine::with_config(self.config);
        for (builder, is_start) in self.states {
            machine.register(builder, is_start)?;
        }
        Ok(machine)
    }
}

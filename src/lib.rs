//! Tickfsm: a minimal, embeddable tick-driven state machine
//!
//! A caller registers named states, each with optional enter, update and
//! exit actions, designates one as the start state, drives the machine
//! with periodic ticks and moves it between states explicitly by name.
//! Everything runs synchronously on the caller's thread.
//!
//! # Core Concepts
//!
//! - **State**: a named node with optional enter/update/exit actions
//! - **Machine**: owns the states, the start designation and the current state
//! - **Tick**: one run of the current state's update action
//! - **Notifications**: `(state, Enter | Exit)` events delivered to observers
//!
//! # Example
//!
//! ```rust
//! use tickfsm::{Machine, State, Transition};
//!
//! let mut machine = Machine::new();
//! machine
//!     .add_start(State::builder("idle").on_enter(|| {}).on_exit(|| {}).build().unwrap())
//!     .unwrap();
//! machine
//!     .add(State::builder("jump").on_enter(|| {}).on_update(|| {}).build().unwrap())
//!     .unwrap();
//!
//! machine.tick().unwrap(); // enters "idle"
//! machine.to("jump").unwrap();
//! machine.tick().unwrap(); // updates "jump"
//!
//! assert_eq!(machine.current_state_name(), Some("jump"));
//! assert_eq!(machine.history().path(), vec!["idle", "jump"]);
//! assert_eq!(machine.history().last().unwrap().transition, Transition::Enter);
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod runtime;
pub mod snapshot;

// Re-export commonly used types
pub use builder::{MachineBuilder, StateBuilder};
pub use crate::core::{Hook, State, StateChange, StateHistory, Transition};
pub use error::{ActionError, ActionResult, ErrorKind, MachineError};
pub use runtime::{DuplicatePolicy, Machine, MachineConfig, ObserverId};
pub use snapshot::MachineSnapshot;

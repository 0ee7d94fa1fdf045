//! Core state machine types.
//!
//! This module contains the building blocks the machine operates on:
//! - `State`: a named node with optional enter/update/exit actions
//! - `Hook` / `Transition`: which action runs and which notification it emits
//! - `StateHistory`: a bounded log of emitted notifications

mod history;
mod state;

pub use history::{StateChange, StateHistory, Transition};
pub use state::{Action, Hook, State};

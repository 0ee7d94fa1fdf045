//! The tick-driven machine and its supporting types.
//!
//! - `Machine`: owns registered states, the start designation and the
//!   current state; driven by `tick`, `to` and `reset`
//! - `MachineConfig`: duplicate-name policy and history size
//! - `Observers`: synchronous subscribers to state-change notifications

mod config;
mod machine;
mod observer;

pub use config::{DuplicatePolicy, MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use machine::Machine;
pub use observer::{ObserverId, Observers};

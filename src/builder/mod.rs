//! Builder API for ergonomic state and machine construction.
//!
//! `StateBuilder` assembles a single state from closures; `MachineBuilder`
//! assembles a whole machine. Validation errors surface from `build()`.

pub mod machine;
pub mod state;

pub use machine::MachineBuilder;
pub use state::StateBuilder;

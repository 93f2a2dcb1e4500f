//! The allocation engine for one application round: data preparation into a
//! normalized model, then a single mixed-integer solve that assigns event
//! occurrences to spaces and times.

pub mod builder;
mod candidates;
pub mod error;
mod grid;
pub mod solver;

pub use builder::build_allocation_data;
pub use error::AllocationError;
pub use solver::{AllocationSolver, FrequencyCap, SolverOptions};

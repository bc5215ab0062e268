//! Domain model types for the travelling thief problem.
//!
//! Provides cities and items, the problem trait the solvers read from, a
//! concrete validated instance, and the mutable solution record.

mod city;
mod instance;
mod problem;
mod solution;

pub use city::{City, Item};
pub use instance::{InstanceError, KnapsackParams, TtpInstance};
pub use problem::ThiefProblem;
pub use solution::TtpSolution;

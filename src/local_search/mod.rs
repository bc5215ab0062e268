//! Local search on the tour side of a travelling thief solution.
//!
//! - [`TourOptimizer`] — Seam for tour improvement with the plan fixed
//! - [`TwoOpt`] — First-improvement 2-opt on the thief objective

mod two_opt;

pub use two_opt::{TourOptimizer, TwoOpt, TwoOptConfig};

//! Knapsack-side optimization for a fixed tour.
//!
//! - [`insert_and_eliminate`] — Greedy insertion then elimination by item score
//! - [`KnapsackAnnealer`] — Simulated annealing over single-item flips with
//!   suffix-only incremental evaluation
//! - [`AnnealConfig`] — Temperature schedule and trials per temperature
//! - [`TrialSampler`] — Source of trial items and acceptance uniforms

mod annealer;
mod config;
mod preprocess;
mod sampler;

pub use annealer::{AnnealResult, KnapsackAnnealer};
pub use config::{trial_factor, AnnealConfig};
pub use preprocess::insert_and_eliminate;
pub use sampler::{metropolis_accept, RngSampler, TrialSampler};

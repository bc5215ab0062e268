//! # u-ttp
//!
//! Travelling thief problem solver: a thief tours every city once and fills
//! a capacity-bound knapsack on the way, slowing down as it gets heavier
//! and paying rent for every unit of travel time.
//!
//! The solver alternates 2-opt on the tour with simulated annealing on the
//! picking plan, using suffix-only incremental evaluation for item flips.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (City, Item, TtpInstance, TtpSolution, Problem trait)
//! - [`distance`] — Distance matrix and coordinate-based distances
//! - [`evaluation`] — Full evaluation, consistency checks, incremental flips
//! - [`constructive`] — Nearest-neighbor tour with density packing
//! - [`knapsack`] — Insert/eliminate preprocessing and the knapsack annealer
//! - [`local_search`] — 2-opt on the thief objective
//! - [`cosolver`] — The alternating tour/knapsack loop
//! - [`io`] — Benchmark instance reader
//! - [`stop`] — Cancellation and time limits

pub mod constructive;
pub mod cosolver;
pub mod distance;
pub mod evaluation;
pub mod io;
pub mod knapsack;
pub mod local_search;
pub mod models;
pub mod stop;

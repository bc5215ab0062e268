//! Distance sources.
//!
//! Provides a dense distance matrix and a coordinate-based alternative for
//! instances too large to tabulate.

mod edge_weight;
mod matrix;

pub use edge_weight::{Distances, EdgeWeight};
pub use matrix::DistanceMatrix;

//! Coordinate-based distances.

use super::DistanceMatrix;
use crate::models::City;

/// Rounding rule applied to the Euclidean distance between two cities.
///
/// Mirrors the `EDGE_WEIGHT_TYPE` values found in TSPLIB-derived benchmark
/// files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeWeight {
    /// Plain Euclidean distance, no rounding.
    Euclidean,
    /// Euclidean distance rounded up (`CEIL_2D`).
    #[default]
    Ceil2d,
    /// Euclidean distance rounded to the nearest integer (`EUC_2D`).
    Nint2d,
}

impl EdgeWeight {
    /// Distance between two cities under this rule.
    pub fn between(self, a: &City, b: &City) -> f64 {
        let d = a.distance_to(b);
        match self {
            EdgeWeight::Euclidean => d,
            EdgeWeight::Ceil2d => d.ceil(),
            EdgeWeight::Nint2d => (d + 0.5).floor(),
        }
    }
}

/// Source of city-to-city distances for an instance.
///
/// Benchmark instances reach tens of thousands of cities, where a dense
/// matrix no longer fits in memory, so coordinates can be kept instead and
/// distances computed on demand.
#[derive(Debug, Clone)]
pub enum Distances {
    /// Precomputed dense matrix.
    Matrix(DistanceMatrix),
    /// Computed from coordinates on every lookup.
    Coordinates {
        /// City locations, indexed by city.
        cities: Vec<City>,
        /// Rounding rule.
        rule: EdgeWeight,
    },
}

impl Distances {
    /// Number of cities covered.
    pub fn size(&self) -> usize {
        match self {
            Distances::Matrix(dm) => dm.size(),
            Distances::Coordinates { cities, .. } => cities.len(),
        }
    }

    /// Distance from `from` to `to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        match self {
            Distances::Matrix(dm) => dm.get(from, to),
            Distances::Coordinates { cities, rule } => rule.between(&cities[from], &cities[to]),
        }
    }

    /// Converts coordinate-based distances into a dense matrix.
    ///
    /// A matrix is returned unchanged.
    pub fn into_matrix(self) -> DistanceMatrix {
        match self {
            Distances::Matrix(dm) => dm,
            Distances::Coordinates { cities, rule } => DistanceMatrix::from_cities(&cities, rule),
        }
    }
}

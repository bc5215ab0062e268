//! Constructive heuristic for building an initial travelling thief solution.
//!
//! - [`nearest_neighbor_tour`] — Greedy nearest-neighbor tour, O(n²)
//! - [`density_packing`] — Greedy packing by profit per weight and
//!   remaining distance, O(m log m)
//! - [`construct`] — Both of the above, evaluated

mod nearest_neighbor;
mod packing;

pub use nearest_neighbor::nearest_neighbor_tour;
pub use packing::{density_packing, item_scores, items_by_score};

use crate::evaluation::evaluate;
use crate::models::{ThiefProblem, TtpSolution};

/// Builds and evaluates an initial solution: nearest-neighbor tour, then
/// density-ordered packing.
///
/// # Examples
///
/// ```
/// use u_ttp::constructive::construct;
/// use u_ttp::distance::{DistanceMatrix, Distances};
/// use u_ttp::models::{Item, KnapsackParams, TtpInstance};
///
/// let dm = DistanceMatrix::from_data(3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
/// let params = KnapsackParams { capacity: 10, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
/// let instance = TtpInstance::new(Distances::Matrix(dm), vec![Item::new(10, 3, 2)], params).unwrap();
///
/// let sol = construct(&instance);
/// assert_eq!(sol.tour(), &[0, 1, 2]);
/// assert!(sol.is_picked(0));
/// assert_eq!(sol.remaining_capacity(), 7);
/// ```
pub fn construct<P: ThiefProblem + ?Sized>(problem: &P) -> TtpSolution {
    let tour = nearest_neighbor_tour(problem);
    let plan = density_packing(problem, &tour);
    let mut solution = TtpSolution::new(tour, plan);
    evaluate(problem, &mut solution);
    solution
}

//! Travelling thief solution state.

use serde::{Deserialize, Serialize};

/// A complete travelling thief solution: a tour, a picking plan, and the
/// per-position accumulation vectors that make incremental re-evaluation
/// possible.
///
/// Every field is owned, so `clone()` yields a fully independent copy.
/// The derived values (`objective`, `weight_acc`, …) are only meaningful
/// after [`evaluate`](crate::evaluation::evaluate) has been run on the
/// solution; [`TtpSolution::new`] leaves them zeroed.
///
/// # Examples
///
/// ```
/// use u_ttp::models::TtpSolution;
///
/// let sol = TtpSolution::new(vec![0, 2, 1], vec![None, Some(2)]);
/// assert_eq!(sol.num_cities(), 3);
/// assert_eq!(sol.num_picked(), 1);
/// assert!(sol.is_picked(1));
/// assert_eq!(sol.city_to_position()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtpSolution {
    pub(crate) tour: Vec<usize>,
    pub(crate) picking_plan: Vec<Option<usize>>,
    pub(crate) objective: f64,
    pub(crate) raw_profit: i64,
    pub(crate) total_time: f64,
    pub(crate) weight_acc: Vec<i64>,
    pub(crate) time_acc: Vec<f64>,
    pub(crate) remaining_capacity: i64,
    pub(crate) city_to_position: Vec<usize>,
}

impl TtpSolution {
    /// Creates an unevaluated solution from a tour and a picking plan.
    ///
    /// `picking_plan[item]` is `Some(city)` when the item is carried.
    pub fn new(tour: Vec<usize>, picking_plan: Vec<Option<usize>>) -> Self {
        let n = tour.len();
        let mut city_to_position = vec![0; n];
        for (pos, &city) in tour.iter().enumerate() {
            if city < n {
                city_to_position[city] = pos;
            }
        }
        Self {
            tour,
            picking_plan,
            objective: 0.0,
            raw_profit: 0,
            total_time: 0.0,
            weight_acc: vec![0; n],
            time_acc: vec![0.0; n],
            remaining_capacity: 0,
            city_to_position,
        }
    }

    /// Cities in visiting order; position 0 holds the start city.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Replaces the tour. The solution must be re-evaluated afterwards.
    pub fn set_tour(&mut self, tour: Vec<usize>) {
        self.tour = tour;
    }

    /// Picking plan: `Some(city)` for carried items.
    pub fn picking_plan(&self) -> &[Option<usize>] {
        &self.picking_plan
    }

    /// Replaces the picking plan. The solution must be re-evaluated afterwards.
    pub fn set_picking_plan(&mut self, plan: Vec<Option<usize>>) {
        self.picking_plan = plan;
    }

    /// Returns `true` if `item` is carried.
    pub fn is_picked(&self, item: usize) -> bool {
        self.picking_plan[item].is_some()
    }

    /// Number of carried items.
    pub fn num_picked(&self) -> usize {
        self.picking_plan.iter().filter(|p| p.is_some()).count()
    }

    /// Number of cities on the tour.
    pub fn num_cities(&self) -> usize {
        self.tour.len()
    }

    /// Net profit: `raw_profit - total_time * rent_rate`.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Sum of the profits of carried items.
    pub fn raw_profit(&self) -> i64 {
        self.raw_profit
    }

    /// Travel time over the closed tour.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Carried weight after leaving each tour position.
    pub fn weight_acc(&self) -> &[i64] {
        &self.weight_acc
    }

    /// Elapsed time on arrival at the next city, per tour position.
    pub fn time_acc(&self) -> &[f64] {
        &self.time_acc
    }

    /// Capacity left after every item is picked.
    pub fn remaining_capacity(&self) -> i64 {
        self.remaining_capacity
    }

    /// Tour position of each city.
    pub fn city_to_position(&self) -> &[usize] {
        &self.city_to_position
    }

    /// Total carried weight at the end of the tour.
    pub fn final_weight(&self) -> i64 {
        self.weight_acc.last().copied().unwrap_or(0)
    }
}

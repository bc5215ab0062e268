//! Tour-side 2-opt with the picking plan held fixed.
//!
//! # Algorithm
//!
//! For each pair of tour positions `1 <= i < j < n`, reversing the segment
//! `[i..=j]` replaces edges `(t[i-1], t[i])` and `(t[j], t[j+1])`:
//!
//! ```text
//! delta = d(t[i-1], t[j]) + d(t[i], t[j+1]) - d(t[i-1], t[i]) - d(t[j], t[j+1])
//! ```
//!
//! Only moves with `delta < 0` are considered. For those, the travelling
//! thief objective of the reversed tour is computed with the plan fixed and
//! the move is accepted when the objective strictly improves
//! (first-improvement). Position 0 stays at city 0.
//!
//! # Complexity
//!
//! O(n²) candidate pairs per pass, each objective check O(n − i).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use log::debug;

use crate::evaluation::evaluate;
use crate::models::{ThiefProblem, TtpSolution};
use crate::stop::StopSignal;

const EPS: f64 = 1e-10;

/// Improves the tour of a solution while leaving its picking plan alone.
///
/// Implementations must return a fully evaluated solution whose objective
/// is not below the objective of the one they were given.
pub trait TourOptimizer<P: ThiefProblem + ?Sized>: Send + Sync {
    /// Optimizes the tour of `solution`, returning early once `stop` fires.
    fn optimize(&self, problem: &P, solution: TtpSolution, stop: &StopSignal) -> TtpSolution;
}

/// Configuration for [`TwoOpt`].
#[derive(Debug, Clone, Default)]
pub struct TwoOptConfig {
    /// Maximum number of full passes (0 = until no move improves).
    pub max_passes: usize,
    /// When set, only segments whose new first edge joins `t[i-1]` to one
    /// of its `k` nearest cities are tried.
    pub neighborhood: Option<usize>,
}

impl TwoOptConfig {
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn with_neighborhood(mut self, k: usize) -> Self {
        self.neighborhood = Some(k);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.neighborhood == Some(0) {
            return Err("neighborhood must be at least 1".into());
        }
        Ok(())
    }
}

/// First-improvement 2-opt on the travelling thief objective.
///
/// # Examples
///
/// ```
/// use u_ttp::distance::{Distances, EdgeWeight};
/// use u_ttp::evaluation::evaluate;
/// use u_ttp::local_search::{TourOptimizer, TwoOpt};
/// use u_ttp::models::{City, KnapsackParams, TtpInstance, TtpSolution};
/// use u_ttp::stop::StopSignal;
///
/// let cities = vec![
///     City::new(0, 0.0, 0.0),
///     City::new(1, 10.0, 0.0),
///     City::new(2, 10.0, 10.0),
///     City::new(3, 0.0, 10.0),
/// ];
/// let distances = Distances::Coordinates { cities, rule: EdgeWeight::Euclidean };
/// let params = KnapsackParams { capacity: 10, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
/// let instance = TtpInstance::new(distances, vec![], params).unwrap();
///
/// // 0 -> 2 -> 1 -> 3 crosses itself
/// let mut sol = TtpSolution::new(vec![0, 2, 1, 3], vec![]);
/// evaluate(&instance, &mut sol);
///
/// let out = TwoOpt::default().optimize(&instance, sol, &StopSignal::never());
/// assert_eq!(out.tour(), &[0, 1, 2, 3]);
/// assert!((out.total_time() - 40.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TwoOpt {
    config: TwoOptConfig,
}

impl TwoOpt {
    /// Creates a 2-opt optimizer.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn new(config: TwoOptConfig) -> Self {
        config.validate().expect("invalid TwoOptConfig");
        Self { config }
    }

    pub fn config(&self) -> &TwoOptConfig {
        &self.config
    }
}

impl<P: ThiefProblem + ?Sized> TourOptimizer<P> for TwoOpt {
    fn optimize(&self, problem: &P, solution: TtpSolution, stop: &StopSignal) -> TtpSolution {
        let mut sol = solution;
        evaluate(problem, &mut sol);
        let n = sol.tour.len();
        if n < 4 {
            return sol;
        }

        let picked_at_city = picked_weight_per_city(problem, &sol);
        let neighbors = self
            .config
            .neighborhood
            .map(|k| nearest_cities(problem, k));

        let mut passes = 0usize;
        let mut moves = 0usize;
        'passes: loop {
            let mut improved = false;
            for i in 1..n - 1 {
                if stop.should_stop() {
                    break 'passes;
                }
                let candidates: Vec<usize> = match &neighbors {
                    Some(lists) => {
                        let mut js: Vec<usize> = lists[sol.tour[i - 1]]
                            .iter()
                            .map(|&c| sol.city_to_position[c])
                            .filter(|&j| j > i)
                            .collect();
                        js.sort_unstable();
                        js
                    }
                    None => (i + 1..n).collect(),
                };

                for j in candidates {
                    if distance_delta(problem, &sol.tour, i, j) >= -EPS {
                        continue;
                    }
                    let candidate = reversed_objective(problem, &sol, &picked_at_city, i, j);
                    if candidate > sol.objective + EPS {
                        sol.tour[i..=j].reverse();
                        evaluate(problem, &mut sol);
                        improved = true;
                        moves += 1;
                    }
                }
            }

            passes += 1;
            if !improved || (self.config.max_passes > 0 && passes >= self.config.max_passes) {
                break;
            }
        }

        debug!(
            "2-opt: {moves} moves in {passes} passes, ob={:.2}",
            sol.objective
        );
        sol
    }
}

/// Tour length change from reversing `tour[i..=j]`.
fn distance_delta<P: ThiefProblem + ?Sized>(problem: &P, tour: &[usize], i: usize, j: usize) -> f64 {
    let n = tour.len();
    let prev = tour[i - 1];
    let next = tour[(j + 1) % n];
    problem.distance(prev, tour[j]) + problem.distance(tour[i], next)
        - problem.distance(prev, tour[i])
        - problem.distance(tour[j], next)
}

/// Objective of `solution` with `tour[i..=j]` reversed, without building the
/// reversed tour.
///
/// Legs before position `i - 1` are unchanged and reused from `time_acc`.
fn reversed_objective<P: ThiefProblem + ?Sized>(
    problem: &P,
    solution: &TtpSolution,
    picked_at_city: &[i64],
    i: usize,
    j: usize,
) -> f64 {
    let tour = &solution.tour;
    let n = tour.len();
    let city_at = |pos: usize| {
        if (i..=j).contains(&pos) {
            tour[i + j - pos]
        } else {
            tour[pos]
        }
    };

    let mut time = if i >= 2 { solution.time_acc[i - 2] } else { 0.0 };
    let mut weight = solution.weight_acc[i - 1];
    time += problem.leg_time(tour[i - 1], city_at(i), weight);
    for pos in i..n {
        let city = city_at(pos);
        weight += picked_at_city[city];
        time += problem.leg_time(city, city_at((pos + 1) % n), weight);
    }
    solution.raw_profit as f64 - time * problem.rent_rate()
}

fn picked_weight_per_city<P: ThiefProblem + ?Sized>(problem: &P, solution: &TtpSolution) -> Vec<i64> {
    let mut picked = vec![0i64; problem.num_cities()];
    for (item, pick) in solution.picking_plan.iter().enumerate() {
        if pick.is_some() {
            picked[problem.availability(item)] += problem.weight(item);
        }
    }
    picked
}

/// The `k` nearest other cities of every city.
fn nearest_cities<P: ThiefProblem + ?Sized>(problem: &P, k: usize) -> Vec<Vec<usize>> {
    let n = problem.num_cities();
    (0..n)
        .map(|from| {
            let mut others: Vec<usize> = (0..n).filter(|&c| c != from).collect();
            let by_distance =
                |a: &usize, b: &usize| problem.distance(from, *a).total_cmp(&problem.distance(from, *b));
            if k < others.len() {
                others.select_nth_unstable_by(k, by_distance);
                others.truncate(k);
            }
            others.sort_by(by_distance);
            others
        })
        .collect()
}

//! Full solution evaluation and consistency checking.

use crate::models::{ThiefProblem, TtpSolution};

/// Recomputes every derived field of `solution` from its tour and picking
/// plan with a single traversal of the closed tour.
///
/// Fills `city_to_position`, `weight_acc`, `time_acc`, `raw_profit`,
/// `total_time`, `remaining_capacity` and `objective`. Items are weighed in
/// at their availability city. Running it twice leaves the solution
/// unchanged.
///
/// # Examples
///
/// ```
/// use u_ttp::distance::{DistanceMatrix, Distances};
/// use u_ttp::evaluation::evaluate;
/// use u_ttp::models::{Item, KnapsackParams, TtpInstance, TtpSolution};
///
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).unwrap();
/// let params = KnapsackParams { capacity: 10, min_speed: 1.0, max_speed: 2.0, rent_rate: 0.5 };
/// let instance = TtpInstance::new(Distances::Matrix(dm), vec![Item::new(10, 10, 1)], params).unwrap();
///
/// let mut sol = TtpSolution::new(vec![0, 1], vec![Some(1)]);
/// evaluate(&instance, &mut sol);
/// // 0 -> 1 empty at speed 2 (2.0), 1 -> 0 full at speed 1 (4.0)
/// assert!((sol.total_time() - 6.0).abs() < 1e-12);
/// assert!((sol.objective() - 7.0).abs() < 1e-12);
/// assert_eq!(sol.remaining_capacity(), 0);
/// ```
pub fn evaluate<P: ThiefProblem + ?Sized>(problem: &P, solution: &mut TtpSolution) {
    let n = solution.tour.len();
    solution.weight_acc.resize(n, 0);
    solution.time_acc.resize(n, 0.0);
    solution.city_to_position.resize(n, 0);

    let mut picked_at_city = vec![0i64; problem.num_cities().max(n)];
    let mut profit = 0i64;
    for (item, pick) in solution.picking_plan.iter().enumerate() {
        if pick.is_some() {
            picked_at_city[problem.availability(item)] += problem.weight(item);
            profit += problem.profit(item);
        }
    }

    let mut weight = 0i64;
    let mut time = 0.0;
    for pos in 0..n {
        let city = solution.tour[pos];
        let next = solution.tour[(pos + 1) % n];
        solution.city_to_position[city] = pos;
        weight += picked_at_city[city];
        time += problem.leg_time(city, next, weight);
        solution.weight_acc[pos] = weight;
        solution.time_acc[pos] = time;
    }

    solution.raw_profit = profit;
    solution.total_time = time;
    solution.remaining_capacity = problem.capacity() - weight;
    solution.objective = profit as f64 - time * problem.rent_rate();
}

/// A disagreement between a solution's stored state and its recomputation.
#[derive(Debug, Clone, PartialEq)]
pub enum Inconsistency {
    /// The tour is not a permutation of all cities.
    NotAPermutation,
    /// The tour does not start at city 0.
    WrongStartCity(usize),
    /// A carried item is recorded at a city other than where it is available.
    WrongPickCity {
        /// Item index.
        item: usize,
        /// Recorded city.
        recorded: usize,
        /// Availability city.
        expected: usize,
    },
    /// Carried weight exceeds the knapsack capacity.
    CapacityExceeded {
        /// Carried weight at the end of the tour.
        weight: i64,
        /// Knapsack capacity.
        capacity: i64,
    },
    /// Stored raw profit differs from the sum of carried profits.
    ProfitMismatch {
        /// Stored value.
        stored: i64,
        /// Recomputed value.
        expected: i64,
    },
    /// Stored travel time differs from a full traversal.
    TimeMismatch {
        /// Stored value.
        stored: f64,
        /// Recomputed value.
        expected: f64,
    },
    /// `objective != raw_profit - total_time * rent_rate`.
    ObjectiveMismatch {
        /// Stored value.
        stored: f64,
        /// Value implied by the stored profit and time.
        expected: f64,
    },
    /// An accumulation vector entry differs from a full traversal.
    AccumulationMismatch {
        /// First offending tour position.
        position: usize,
    },
}

/// Compares the stored state of `solution` with a full recomputation.
///
/// Floating-point fields are compared with absolute tolerance `tol`.
/// Returns an empty list for a consistent solution.
pub fn check_consistency<P: ThiefProblem + ?Sized>(
    problem: &P,
    solution: &TtpSolution,
    tol: f64,
) -> Vec<Inconsistency> {
    let mut found = Vec::new();
    let n = problem.num_cities();

    let mut seen = vec![false; n];
    let is_permutation = solution.tour.len() == n
        && solution
            .tour
            .iter()
            .all(|&c| c < n && !std::mem::replace(&mut seen[c], true));
    if !is_permutation {
        found.push(Inconsistency::NotAPermutation);
        return found;
    }
    if solution.tour[0] != 0 {
        found.push(Inconsistency::WrongStartCity(solution.tour[0]));
    }

    for (item, pick) in solution.picking_plan.iter().enumerate() {
        if let Some(city) = *pick {
            let expected = problem.availability(item);
            if city != expected {
                found.push(Inconsistency::WrongPickCity {
                    item,
                    recorded: city,
                    expected,
                });
            }
        }
    }

    let mut fresh = solution.clone();
    evaluate(problem, &mut fresh);

    if fresh.final_weight() > problem.capacity() {
        found.push(Inconsistency::CapacityExceeded {
            weight: fresh.final_weight(),
            capacity: problem.capacity(),
        });
    }
    if fresh.raw_profit != solution.raw_profit {
        found.push(Inconsistency::ProfitMismatch {
            stored: solution.raw_profit,
            expected: fresh.raw_profit,
        });
    }
    if (fresh.total_time - solution.total_time).abs() > tol {
        found.push(Inconsistency::TimeMismatch {
            stored: solution.total_time,
            expected: fresh.total_time,
        });
    }
    let implied = solution.raw_profit as f64 - solution.total_time * problem.rent_rate();
    if (implied - solution.objective).abs() > tol {
        found.push(Inconsistency::ObjectiveMismatch {
            stored: solution.objective,
            expected: implied,
        });
    }
    let mismatch = (0..n).find(|&pos| {
        fresh.weight_acc[pos] != solution.weight_acc.get(pos).copied().unwrap_or(i64::MIN)
            || solution
                .time_acc
                .get(pos)
                .is_none_or(|&t| (fresh.time_acc[pos] - t).abs() > tol)
    });
    if let Some(position) = mismatch {
        found.push(Inconsistency::AccumulationMismatch { position });
    }

    found
}

//! Incremental evaluation of single-item bit flips.
//!
//! Flipping an item changes the carried weight only from the tour position
//! of its availability city onward. Travel time before that position is
//! reused from `time_acc`, so a flip costs O(n − origin) instead of a full
//! O(n) traversal plus the item scan.

use crate::models::{ThiefProblem, TtpSolution};

/// Travel time of the closed tour if every position from `origin` onward
/// carried `delta_weight` more (or less) weight.
///
/// Reads `solution` only. The prefix time `time_acc[origin - 1]` is taken
/// as-is; the legs from `origin` through the closing leg back to the start
/// city are recomputed.
pub fn suffix_travel_time<P: ThiefProblem + ?Sized>(
    problem: &P,
    solution: &TtpSolution,
    origin: usize,
    delta_weight: i64,
) -> f64 {
    let n = solution.tour.len();
    let mut time = prefix_time(solution, origin);
    for pos in origin..n {
        let weight = solution.weight_acc[pos] + delta_weight;
        time += problem.leg_time(solution.tour[pos], solution.tour[(pos + 1) % n], weight);
    }
    time
}

/// Same traversal as [`suffix_travel_time`], but writes the shifted
/// `weight_acc` and recomputed `time_acc` entries back into `solution`.
///
/// Returns the new total travel time. Does not touch `raw_profit`,
/// `objective` or the picking plan.
pub fn rewrite_suffix<P: ThiefProblem + ?Sized>(
    problem: &P,
    solution: &mut TtpSolution,
    origin: usize,
    delta_weight: i64,
) -> f64 {
    let n = solution.tour.len();
    let mut time = prefix_time(solution, origin);
    for pos in origin..n {
        let weight = solution.weight_acc[pos] + delta_weight;
        time += problem.leg_time(solution.tour[pos], solution.tour[(pos + 1) % n], weight);
        solution.weight_acc[pos] = weight;
        solution.time_acc[pos] = time;
    }
    time
}

fn prefix_time(solution: &TtpSolution, origin: usize) -> f64 {
    if origin == 0 {
        0.0
    } else {
        solution.time_acc[origin - 1]
    }
}

/// A candidate flip of one item's picked state, evaluated against a
/// specific solution.
///
/// Produced by [`FlipMove::evaluate`] and applied with
/// [`FlipMove::commit`]. A move must be committed to the same, unmodified
/// solution it was evaluated on.
///
/// # Examples
///
/// ```
/// use u_ttp::distance::{DistanceMatrix, Distances};
/// use u_ttp::evaluation::{evaluate, FlipMove};
/// use u_ttp::models::{Item, KnapsackParams, TtpInstance, TtpSolution};
///
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 4.0, 4.0, 0.0]).unwrap();
/// let params = KnapsackParams { capacity: 10, min_speed: 1.0, max_speed: 2.0, rent_rate: 0.5 };
/// let instance = TtpInstance::new(Distances::Matrix(dm), vec![Item::new(10, 10, 1)], params).unwrap();
///
/// let mut sol = TtpSolution::new(vec![0, 1], vec![None]);
/// evaluate(&instance, &mut sol);
///
/// let mv = FlipMove::evaluate(&instance, &sol, 0).expect("fits");
/// assert!(mv.gain(&sol) > 0.0);
/// mv.commit(&instance, &mut sol);
/// assert!(sol.is_picked(0));
/// assert!((sol.objective() - 7.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipMove {
    /// Item being flipped.
    pub item: usize,
    /// `true` when the item is added, `false` when dropped.
    pub adds: bool,
    /// Profit change.
    pub delta_profit: i64,
    /// Weight change applied from `origin` onward.
    pub delta_weight: i64,
    /// Tour position of the item's availability city.
    pub origin: usize,
    /// Raw profit after the flip.
    pub profit: i64,
    /// Total travel time after the flip.
    pub travel_time: f64,
    /// Objective after the flip.
    pub objective: f64,
}

impl FlipMove {
    /// Evaluates flipping `item` in `solution` without modifying it.
    ///
    /// Returns `None` when the item is not carried and its weight exceeds
    /// the solution's remaining capacity.
    pub fn evaluate<P: ThiefProblem + ?Sized>(
        problem: &P,
        solution: &TtpSolution,
        item: usize,
    ) -> Option<Self> {
        let adds = !solution.is_picked(item);
        let weight = problem.weight(item);
        if adds && weight > solution.remaining_capacity {
            return None;
        }

        let (delta_profit, delta_weight) = if adds {
            (problem.profit(item), weight)
        } else {
            (-problem.profit(item), -weight)
        };
        let profit = solution.raw_profit + delta_profit;
        let origin = solution.city_to_position[problem.availability(item)];
        let travel_time = suffix_travel_time(problem, solution, origin, delta_weight);
        let objective = profit as f64 - travel_time * problem.rent_rate();

        Some(Self {
            item,
            adds,
            delta_profit,
            delta_weight,
            origin,
            profit,
            travel_time,
            objective,
        })
    }

    /// Objective change relative to `solution`.
    pub fn gain(&self, solution: &TtpSolution) -> f64 {
        self.objective - solution.objective
    }

    /// Applies the flip and rewrites the accumulation suffix.
    ///
    /// Returns the committed objective.
    pub fn commit<P: ThiefProblem + ?Sized>(&self, problem: &P, solution: &mut TtpSolution) -> f64 {
        solution.picking_plan[self.item] = if self.adds {
            Some(problem.availability(self.item))
        } else {
            None
        };

        let time = rewrite_suffix(problem, solution, self.origin, self.delta_weight);
        solution.raw_profit = self.profit;
        solution.total_time = time;
        solution.objective = self.profit as f64 - time * problem.rent_rate();
        solution.remaining_capacity = problem.capacity() - solution.final_weight();
        solution.objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{DistanceMatrix, Distances};
    use crate::evaluation::{check_consistency, evaluate};
    use crate::models::{Item, KnapsackParams, TtpInstance};
    use proptest::prelude::*;

    fn line_instance(items: Vec<Item>, capacity: i64) -> TtpInstance {
        #[rustfmt::skip]
        let data = vec![
            0.0, 2.0, 4.0, 6.0, 3.0,
            2.0, 0.0, 2.0, 4.0, 5.0,
            4.0, 2.0, 0.0, 2.0, 7.0,
            6.0, 4.0, 2.0, 0.0, 9.0,
            3.0, 5.0, 7.0, 9.0, 0.0,
        ];
        let dm = DistanceMatrix::from_data(5, data).expect("valid");
        let params = KnapsackParams {
            capacity,
            min_speed: 0.1,
            max_speed: 1.0,
            rent_rate: 2.0,
        };
        TtpInstance::new(Distances::Matrix(dm), items, params).expect("valid")
    }

    fn items() -> Vec<Item> {
        vec![
            Item::new(30, 5, 1),
            Item::new(25, 8, 2),
            Item::new(12, 3, 3),
            Item::new(40, 9, 4),
            Item::new(8, 1, 2),
        ]
    }

    fn assert_matches_full(inst: &TtpInstance, sol: &TtpSolution) {
        let mut fresh = sol.clone();
        evaluate(inst, &mut fresh);
        assert_eq!(sol.weight_acc(), fresh.weight_acc());
        assert_eq!(sol.raw_profit(), fresh.raw_profit());
        assert_eq!(sol.remaining_capacity(), fresh.remaining_capacity());
        for (a, b) in sol.time_acc().iter().zip(fresh.time_acc()) {
            assert!((a - b).abs() < 1e-9, "time_acc {a} vs {b}");
        }
        assert!((sol.total_time() - fresh.total_time()).abs() < 1e-9);
        assert!((sol.objective() - fresh.objective()).abs() < 1e-9);
    }

    #[test]
    fn test_add_matches_full_recompute() {
        let inst = line_instance(items(), 20);
        let mut sol = TtpSolution::new(vec![0, 1, 2, 3, 4], vec![None; 5]);
        evaluate(&inst, &mut sol);

        let mv = FlipMove::evaluate(&inst, &sol, 1).expect("fits");
        assert!(mv.adds);
        assert_eq!(mv.origin, 2);
        assert_eq!(mv.delta_weight, 8);

        let mut flipped = sol.clone();
        flipped.picking_plan[1] = Some(2);
        evaluate(&inst, &mut flipped);
        assert!((mv.travel_time - flipped.total_time()).abs() < 1e-9);
        assert!((mv.objective - flipped.objective()).abs() < 1e-9);

        mv.commit(&inst, &mut sol);
        assert_matches_full(&inst, &sol);
    }

    #[test]
    fn test_drop_matches_full_recompute() {
        let inst = line_instance(items(), 20);
        let mut sol = TtpSolution::new(vec![0, 3, 1, 4, 2], vec![Some(1), None, Some(3), None, Some(2)]);
        evaluate(&inst, &mut sol);

        let mv = FlipMove::evaluate(&inst, &sol, 2).expect("drop always feasible");
        assert!(!mv.adds);
        assert_eq!(mv.origin, 1);
        mv.commit(&inst, &mut sol);
        assert!(!sol.is_picked(2));
        assert_matches_full(&inst, &sol);
    }

    #[test]
    fn test_origin_at_start_uses_zero_prefix() {
        let inst = line_instance(vec![Item::new(5, 2, 0)], 10);
        let mut sol = TtpSolution::new(vec![0, 1, 2, 3, 4], vec![None]);
        evaluate(&inst, &mut sol);
        let mv = FlipMove::evaluate(&inst, &sol, 0).expect("fits");
        assert_eq!(mv.origin, 0);
        mv.commit(&inst, &mut sol);
        assert_matches_full(&inst, &sol);
    }

    #[test]
    fn test_infeasible_add_rejected() {
        let inst = line_instance(items(), 10);
        let mut sol = TtpSolution::new(vec![0, 1, 2, 3, 4], vec![Some(1), None, None, None, None]);
        evaluate(&inst, &mut sol);
        assert_eq!(sol.remaining_capacity(), 5);
        assert!(FlipMove::evaluate(&inst, &sol, 1).is_none());
        assert!(FlipMove::evaluate(&inst, &sol, 2).is_some());
    }

    #[test]
    fn test_evaluate_does_not_mutate() {
        let inst = line_instance(items(), 20);
        let mut sol = TtpSolution::new(vec![0, 4, 3, 2, 1], vec![None; 5]);
        evaluate(&inst, &mut sol);
        let before = sol.clone();
        let _ = FlipMove::evaluate(&inst, &sol, 3);
        assert_eq!(sol, before);
    }

    #[test]
    fn test_chain_of_flips_stays_consistent() {
        let inst = line_instance(items(), 20);
        let mut sol = TtpSolution::new(vec![0, 2, 4, 1, 3], vec![None; 5]);
        evaluate(&inst, &mut sol);
        for item in [0, 1, 4, 0, 2, 3, 1, 4, 2] {
            if let Some(mv) = FlipMove::evaluate(&inst, &sol, item) {
                let committed = mv.commit(&inst, &mut sol);
                assert_eq!(committed, mv.objective);
                assert!(sol.remaining_capacity() >= 0);
            }
        }
        assert!(check_consistency(&inst, &sol, 1e-9).is_empty());
    }

    proptest! {
        #[test]
        fn prop_suffix_update_equals_full_recompute(
            weights in prop::collection::vec(1i64..20, 6),
            profits in prop::collection::vec(0i64..100, 6),
            cities in prop::collection::vec(1usize..5, 6),
            initial in prop::collection::vec(any::<bool>(), 6),
            rotation in 0usize..4,
            item in 0usize..6,
        ) {
            let items: Vec<Item> = (0..6)
                .map(|k| Item::new(profits[k], weights[k], cities[k]))
                .collect();
            let inst = line_instance(items, 200);
            let mut rest = vec![1, 2, 3, 4];
            rest.rotate_left(rotation);
            let mut tour = vec![0];
            tour.extend(rest);
            let plan = (0..6).map(|k| initial[k].then_some(cities[k])).collect();
            let mut sol = TtpSolution::new(tour, plan);
            evaluate(&inst, &mut sol);

            let mv = FlipMove::evaluate(&inst, &sol, item).expect("capacity is ample");
            let mut flipped = sol.clone();
            flipped.picking_plan[item] = if mv.adds { Some(cities[item]) } else { None };
            evaluate(&inst, &mut flipped);

            mv.commit(&inst, &mut sol);
            prop_assert_eq!(sol.weight_acc(), flipped.weight_acc());
            prop_assert!((sol.total_time() - flipped.total_time()).abs() < 1e-9);
            for (a, b) in sol.time_acc().iter().zip(flipped.time_acc()) {
                prop_assert!((a - b).abs() < 1e-9);
            }
            prop_assert!((sol.objective() - flipped.objective()).abs() < 1e-9);
        }
    }
}

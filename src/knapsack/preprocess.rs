//! Knapsack preprocessing: greedy insertion followed by elimination.
//!
//! # Algorithm
//!
//! 1. Rank items by [`item_scores`] for the current tour.
//! 2. Insertion: walk unpicked items from best to worst score and add each
//!    one that fits and strictly raises the objective.
//! 3. Elimination: walk picked items from worst to best score and drop each
//!    one whose removal strictly raises the objective.
//!
//! Every flip goes through [`FlipMove`], so the accumulation vectors stay
//! valid throughout and each check costs O(n − origin).

use log::debug;

use crate::constructive::{item_scores, items_by_score};
use crate::evaluation::{evaluate, FlipMove};
use crate::models::{ThiefProblem, TtpSolution};

/// Improves the picking plan of `solution` with one insertion pass and one
/// elimination pass. The tour is not changed and the objective never
/// decreases.
///
/// # Examples
///
/// ```
/// use u_ttp::distance::{DistanceMatrix, Distances};
/// use u_ttp::evaluation::evaluate;
/// use u_ttp::knapsack::insert_and_eliminate;
/// use u_ttp::models::{Item, KnapsackParams, TtpInstance, TtpSolution};
///
/// let dm = DistanceMatrix::from_data(3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
/// // The heavy item costs more in rent than it earns.
/// let items = vec![Item::new(10, 2, 1), Item::new(1, 9, 1)];
/// let params = KnapsackParams { capacity: 20, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
/// let instance = TtpInstance::new(Distances::Matrix(dm), items, params).unwrap();
///
/// let mut sol = TtpSolution::new(vec![0, 1, 2], vec![None, Some(1)]);
/// evaluate(&instance, &mut sol);
///
/// let improved = insert_and_eliminate(&instance, sol.clone());
/// assert_eq!(improved.picking_plan(), &[Some(1), None]);
/// assert!(improved.objective() > sol.objective());
/// ```
pub fn insert_and_eliminate<P: ThiefProblem + ?Sized>(
    problem: &P,
    solution: TtpSolution,
) -> TtpSolution {
    let mut sol = solution;
    evaluate(problem, &mut sol);

    let scores = item_scores(problem, sol.tour());
    let order = items_by_score(&scores);

    let mut inserted = 0usize;
    for &item in &order {
        if sol.is_picked(item) {
            continue;
        }
        if let Some(mv) = FlipMove::evaluate(problem, &sol, item) {
            if mv.gain(&sol) > 0.0 {
                mv.commit(problem, &mut sol);
                inserted += 1;
            }
        }
    }

    let mut eliminated = 0usize;
    for &item in order.iter().rev() {
        if !sol.is_picked(item) {
            continue;
        }
        if let Some(mv) = FlipMove::evaluate(problem, &sol, item) {
            if mv.gain(&sol) > 0.0 {
                mv.commit(problem, &mut sol);
                eliminated += 1;
            }
        }
    }

    evaluate(problem, &mut sol);
    debug!(
        "insert/eliminate: +{inserted} -{eliminated} items, ob={:.2}",
        sol.objective()
    );
    sol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{DistanceMatrix, Distances};
    use crate::evaluation::check_consistency;
    use crate::models::{Item, KnapsackParams, TtpInstance};

    fn instance(items: Vec<Item>, capacity: i64) -> TtpInstance {
        #[rustfmt::skip]
        let data = vec![
            0.0, 4.0, 6.0, 3.0,
            4.0, 0.0, 3.0, 5.0,
            6.0, 3.0, 0.0, 4.0,
            3.0, 5.0, 4.0, 0.0,
        ];
        let dm = DistanceMatrix::from_data(4, data).expect("valid");
        let params = KnapsackParams {
            capacity,
            min_speed: 0.1,
            max_speed: 1.0,
            rent_rate: 1.0,
        };
        TtpInstance::new(Distances::Matrix(dm), items, params).expect("valid")
    }

    fn evaluated(inst: &TtpInstance, plan: Vec<Option<usize>>) -> TtpSolution {
        let mut sol = TtpSolution::new(vec![0, 1, 2, 3], plan);
        evaluate(inst, &mut sol);
        sol
    }

    #[test]
    fn test_inserts_profitable_items() {
        let inst = instance(vec![Item::new(100, 2, 3), Item::new(80, 3, 2)], 20);
        let sol = evaluated(&inst, vec![None, None]);
        let out = insert_and_eliminate(&inst, sol.clone());
        assert_eq!(out.num_picked(), 2);
        assert!(out.objective() > sol.objective());
    }

    #[test]
    fn test_eliminates_losing_items() {
        // Picked at city 1 and carried over almost the whole tour at near-minimum speed.
        let inst = instance(vec![Item::new(2, 19, 1)], 20);
        let sol = evaluated(&inst, vec![Some(1)]);
        let out = insert_and_eliminate(&inst, sol.clone());
        assert_eq!(out.num_picked(), 0);
        assert!(out.objective() > sol.objective());
    }

    #[test]
    fn test_never_worse_and_consistent() {
        let items = vec![
            Item::new(40, 8, 1),
            Item::new(15, 9, 1),
            Item::new(60, 5, 2),
            Item::new(5, 7, 2),
            Item::new(30, 4, 3),
            Item::new(1, 6, 3),
        ];
        let inst = instance(items, 20);
        for plan in [
            vec![None; 6],
            vec![Some(1), Some(1), None, None, None, None],
            vec![None, None, Some(2), Some(2), Some(3), None],
        ] {
            let sol = evaluated(&inst, plan);
            let out = insert_and_eliminate(&inst, sol.clone());
            assert!(out.objective() >= sol.objective() - 1e-9);
            assert!(out.remaining_capacity() >= 0);
            assert!(check_consistency(&inst, &out, 1e-9).is_empty());
            assert_eq!(out.tour(), sol.tour());
        }
    }

    #[test]
    fn test_respects_capacity_during_insertion() {
        let inst = instance(vec![Item::new(500, 15, 3), Item::new(400, 15, 3)], 20);
        let sol = evaluated(&inst, vec![None, None]);
        let out = insert_and_eliminate(&inst, sol);
        assert_eq!(out.num_picked(), 1);
    }
}

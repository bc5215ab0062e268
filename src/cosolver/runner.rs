//! Co-solver execution loop.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::{debug, info};
use u_numflow::random::create_rng;

use super::config::CoSolverConfig;
use crate::constructive::construct;
use crate::evaluation::evaluate;
use crate::knapsack::{insert_and_eliminate, KnapsackAnnealer, RngSampler};
use crate::local_search::{TourOptimizer, TwoOpt};
use crate::models::{ThiefProblem, TtpSolution};
use crate::stop::StopSignal;

/// Result of a co-solver run.
#[derive(Debug, Clone)]
pub struct CoSolverResult {
    /// The best solution found, fully evaluated.
    pub best: TtpSolution,

    /// Objective of the best solution.
    pub best_objective: f64,

    /// Number of rounds started.
    pub rounds: usize,

    /// Whether the run ended on cancellation or the time limit.
    pub cancelled: bool,

    /// Best objective before the first round and after each round.
    pub objective_history: Vec<f64>,
}

/// Alternates tour optimization and knapsack annealing until a round no
/// longer improves the best objective.
pub struct CoSolver;

impl CoSolver {
    /// Solves an instance from scratch: nearest-neighbor tour with density
    /// packing, insert-and-eliminate, then the 2-opt / annealing loop.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_ttp::cosolver::{CoSolver, CoSolverConfig};
    /// use u_ttp::distance::{Distances, EdgeWeight};
    /// use u_ttp::knapsack::AnnealConfig;
    /// use u_ttp::models::{City, Item, KnapsackParams, TtpInstance};
    ///
    /// let cities = vec![
    ///     City::new(0, 0.0, 0.0),
    ///     City::new(1, 10.0, 10.0),
    ///     City::new(2, 10.0, 0.0),
    ///     City::new(3, 0.0, 10.0),
    /// ];
    /// let items = vec![Item::new(40, 3, 1), Item::new(30, 5, 2), Item::new(10, 8, 3)];
    /// let params = KnapsackParams { capacity: 10, min_speed: 0.1, max_speed: 1.0, rent_rate: 0.5 };
    /// let distances = Distances::Coordinates { cities, rule: EdgeWeight::Ceil2d };
    /// let instance = TtpInstance::new(distances, items, params).unwrap();
    ///
    /// let config = CoSolverConfig::default()
    ///     .with_seed(42)
    ///     .with_anneal(AnnealConfig::default().with_trials_per_temperature(200));
    /// let result = CoSolver::solve(&instance, &config);
    ///
    /// assert_eq!(result.best.tour()[0], 0);
    /// assert!(result.best.remaining_capacity() >= 0);
    /// assert!(!result.cancelled);
    /// ```
    pub fn solve<P: ThiefProblem + ?Sized>(problem: &P, config: &CoSolverConfig) -> CoSolverResult {
        Self::solve_with_cancel(problem, config, None)
    }

    /// Like [`solve`](Self::solve), with an optional cancellation flag.
    ///
    /// The time limit, if any, covers construction as well as the loop.
    pub fn solve_with_cancel<P: ThiefProblem + ?Sized>(
        problem: &P,
        config: &CoSolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> CoSolverResult {
        config.validate().expect("invalid CoSolverConfig");
        let stop = stop_signal(config, cancel);

        let initial = construct(problem);
        debug!("constructed: ob={:.2}", initial.objective());
        let initial = insert_and_eliminate(problem, initial);

        let optimizer = TwoOpt::new(config.two_opt.clone());
        Self::run_with_stop(problem, initial, &optimizer, config, &stop)
    }

    /// Runs the loop from `initial` with a caller-supplied tour optimizer.
    ///
    /// `initial` is evaluated before the first round, so it need not carry
    /// up-to-date derived fields.
    pub fn run<P, T>(
        problem: &P,
        initial: TtpSolution,
        tour_optimizer: &T,
        config: &CoSolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> CoSolverResult
    where
        P: ThiefProblem + ?Sized,
        T: TourOptimizer<P> + ?Sized,
    {
        config.validate().expect("invalid CoSolverConfig");
        let stop = stop_signal(config, cancel);
        Self::run_with_stop(problem, initial, tour_optimizer, config, &stop)
    }

    /// Runs the loop from `initial`, polling `stop` at the top of every
    /// round and inside both phases.
    pub fn run_with_stop<P, T>(
        problem: &P,
        initial: TtpSolution,
        tour_optimizer: &T,
        config: &CoSolverConfig,
        stop: &StopSignal,
    ) -> CoSolverResult
    where
        P: ThiefProblem + ?Sized,
        T: TourOptimizer<P> + ?Sized,
    {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let mut best = initial;
        evaluate(problem, &mut best);
        let mut objective_history = vec![best.objective()];
        let mut rounds = 0usize;
        let mut cancelled = false;

        loop {
            if stop.should_stop() {
                cancelled = true;
                break;
            }
            if config.max_rounds > 0 && rounds >= config.max_rounds {
                break;
            }
            rounds += 1;

            let toured = tour_optimizer.optimize(problem, best.clone(), stop);
            let annealed = KnapsackAnnealer::run_with_stop(
                problem,
                toured,
                &config.anneal,
                &mut RngSampler::new(&mut rng),
                stop,
            );

            let improved = annealed.best_objective > best.objective();
            if improved {
                best = annealed.best;
            }
            objective_history.push(best.objective());
            debug!(
                "round {rounds}: ob={:.2} wend={} improved={improved}",
                best.objective(),
                best.remaining_capacity()
            );

            if annealed.cancelled || stop.should_stop() {
                cancelled = true;
                break;
            }
            if !improved {
                break;
            }
        }

        info!(
            "co-solver finished after {rounds} rounds: ob={:.2}{}",
            best.objective(),
            if cancelled { " (cancelled)" } else { "" }
        );

        CoSolverResult {
            best_objective: best.objective(),
            best,
            rounds,
            cancelled,
            objective_history,
        }
    }
}

fn stop_signal(config: &CoSolverConfig, cancel: Option<Arc<AtomicBool>>) -> StopSignal {
    let stop = StopSignal::from_flag(cancel);
    match config.time_limit {
        Some(limit) => stop.with_time_limit(limit),
        None => stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{Distances, EdgeWeight};
    use crate::evaluation::check_consistency;
    use crate::knapsack::AnnealConfig;
    use crate::models::{City, Item, KnapsackParams, TtpInstance};
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn random_instance(seed: u64, n: usize, items_per_city: usize) -> TtpInstance {
        let mut rng = create_rng(seed);
        let cities: Vec<City> = (0..n)
            .map(|id| City::new(id, rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let mut items = Vec::new();
        for city in 1..n {
            for _ in 0..items_per_city {
                items.push(Item::new(
                    rng.random_range(10..200),
                    rng.random_range(1..50),
                    city,
                ));
            }
        }
        let total: i64 = items.iter().map(|it| it.weight()).sum();
        let params = KnapsackParams {
            capacity: (total / 3).max(1),
            min_speed: 0.1,
            max_speed: 1.0,
            rent_rate: 0.3,
        };
        let distances = Distances::Coordinates {
            cities,
            rule: EdgeWeight::Ceil2d,
        };
        TtpInstance::new(distances, items, params).expect("valid")
    }

    fn fast_config(seed: u64) -> CoSolverConfig {
        CoSolverConfig::default()
            .with_seed(seed)
            .with_anneal(AnnealConfig::default().with_trials_per_temperature(300))
    }

    /// Tour optimizer that leaves the tour alone and counts its calls.
    #[derive(Default)]
    struct Identity {
        calls: AtomicUsize,
    }

    impl<P: ThiefProblem + ?Sized> TourOptimizer<P> for Identity {
        fn optimize(&self, problem: &P, solution: TtpSolution, _stop: &StopSignal) -> TtpSolution {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let mut sol = solution;
            evaluate(problem, &mut sol);
            sol
        }
    }

    #[test]
    fn test_solve_end_to_end() {
        let inst = random_instance(1, 20, 2);
        let result = CoSolver::solve(&inst, &fast_config(5));

        assert!(!result.cancelled);
        assert!(result.rounds >= 1);
        assert_eq!(result.best.tour()[0], 0);
        assert!(result.best.remaining_capacity() >= 0);
        assert!(check_consistency(&inst, &result.best, 1e-6).is_empty());
        assert_eq!(result.best_objective, result.best.objective());
        assert_eq!(result.objective_history.len(), result.rounds + 1);

        let start = insert_and_eliminate(&inst, construct(&inst));
        assert!(result.best_objective >= start.objective() - 1e-9);
    }

    #[test]
    fn test_history_is_monotonic() {
        let inst = random_instance(2, 25, 3);
        let result = CoSolver::solve(&inst, &fast_config(9));
        for pair in result.objective_history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        let last = result.objective_history.last().copied().unwrap_or(f64::NAN);
        assert_eq!(last, result.best_objective);
    }

    #[test]
    fn test_same_seed_same_result() {
        let inst = random_instance(3, 15, 2);
        let a = CoSolver::solve(&inst, &fast_config(77));
        let b = CoSolver::solve(&inst, &fast_config(77));
        assert_eq!(a.best.tour(), b.best.tour());
        assert_eq!(a.best.picking_plan(), b.best.picking_plan());
        assert_eq!(a.best_objective, b.best_objective);
    }

    #[test]
    fn test_preset_cancel_returns_initial() {
        let inst = random_instance(4, 12, 2);
        let initial = construct(&inst);
        let flag = Arc::new(AtomicBool::new(true));
        let optimizer = Identity::default();

        let result = CoSolver::run(&inst, initial.clone(), &optimizer, &fast_config(1), Some(flag));

        assert!(result.cancelled);
        assert_eq!(result.rounds, 0);
        assert_eq!(result.best, initial);
        assert_eq!(result.objective_history, vec![initial.objective()]);
        assert_eq!(optimizer.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_stops_after_first_non_improving_round() {
        let inst = random_instance(5, 15, 2);
        let optimizer = Identity::default();
        let result = CoSolver::run(&inst, construct(&inst), &optimizer, &fast_config(3), None);

        assert!(!result.cancelled);
        assert_eq!(optimizer.calls.load(Ordering::Relaxed), result.rounds);
        let h = &result.objective_history;
        // every round but the last improved
        for pair in h[..h.len() - 1].windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(h[h.len() - 1], h[h.len() - 2]);
    }

    #[test]
    fn test_max_rounds() {
        let inst = random_instance(6, 15, 2);
        let config = fast_config(2).with_max_rounds(1);
        let result = CoSolver::solve(&inst, &config);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.objective_history.len(), 2);
    }

    #[test]
    fn test_time_limit_acts_as_cancel() {
        let inst = random_instance(7, 15, 2);
        let config = fast_config(2).with_time_limit(Duration::from_nanos(1));
        let result = CoSolver::solve(&inst, &config);
        assert!(result.cancelled);
        assert_eq!(result.rounds, 0);
        assert!(check_consistency(&inst, &result.best, 1e-6).is_empty());
    }

    #[test]
    fn test_unevaluated_initial_is_reconciled() {
        let inst = random_instance(8, 10, 1);
        let tour: Vec<usize> = (0..inst.num_cities()).collect();
        let raw = TtpSolution::new(tour, vec![None; inst.num_items()]);
        let flag = Arc::new(AtomicBool::new(true));

        let result = CoSolver::run(&inst, raw, &TwoOpt::default(), &fast_config(1), Some(flag));
        assert!(check_consistency(&inst, &result.best, 1e-9).is_empty());
    }

    #[test]
    #[should_panic(expected = "invalid CoSolverConfig")]
    fn test_invalid_config_panics() {
        let inst = random_instance(9, 5, 1);
        let config = CoSolverConfig::default().with_time_limit(Duration::ZERO);
        CoSolver::solve(&inst, &config);
    }
}

//! Simulated annealing over the picking plan with the tour held fixed.
//!
//! # Algorithm
//!
//! At each temperature step, run a fixed number of trials. A trial picks a
//! random item and evaluates flipping it with a suffix-only recomputation
//! of travel time ([`FlipMove`]). Items that do not fit the live remaining
//! capacity are skipped. The candidate objective is compared against the
//! chain energy (the last accepted objective) with the Metropolis rule; an
//! accepted flip is committed in place and becomes the new chain energy.
//!
//! The best solution is snapshotted once per temperature step, not per
//! trial. The chain energy may fall below it after an accepted worsening
//! move. The returned best solution is fully re-evaluated before return.
//!
//! # Reference
//!
//! El Yafrani, M. & Ahiod, B. (2016). "Population-based vs. single-solution
//! heuristics for the travelling thief problem", *GECCO '16*, 317-324.

use log::{debug, trace};

use super::config::AnnealConfig;
use super::sampler::{metropolis_accept, TrialSampler};
use crate::evaluation::{evaluate, FlipMove};
use crate::models::{ThiefProblem, TtpSolution};
use crate::stop::StopSignal;

/// Result of a knapsack annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// The best solution found, fully re-evaluated.
    pub best: TtpSolution,

    /// Objective of `best`.
    pub best_objective: f64,

    /// Trials drawn, including skipped ones.
    pub trials: u64,

    /// Trials skipped because the item did not fit.
    pub skipped_infeasible: u64,

    /// Accepted flips (including improvements).
    pub accepted_moves: u64,

    /// Flips that raised the chain energy.
    pub improving_moves: u64,

    /// Temperature steps completed.
    pub temperature_steps: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Whether the stop signal cut the schedule short.
    pub cancelled: bool,

    /// Best objective after each temperature step, starting with the input.
    pub objective_history: Vec<f64>,
}

/// Runs simulated annealing on the knapsack part of a solution.
pub struct KnapsackAnnealer;

impl KnapsackAnnealer {
    /// Anneals the picking plan of `solution`.
    ///
    /// `solution` must already be evaluated; its objective seeds the chain
    /// energy.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_ttp::distance::{DistanceMatrix, Distances};
    /// use u_ttp::evaluation::evaluate;
    /// use u_ttp::knapsack::{AnnealConfig, KnapsackAnnealer, RngSampler};
    /// use u_ttp::models::{Item, KnapsackParams, TtpInstance, TtpSolution};
    ///
    /// let dm = DistanceMatrix::from_data(3, vec![0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0, 2.0, 0.0]).unwrap();
    /// let items = vec![Item::new(50, 4, 1), Item::new(1, 9, 2)];
    /// let params = KnapsackParams { capacity: 10, min_speed: 0.1, max_speed: 1.0, rent_rate: 1.0 };
    /// let instance = TtpInstance::new(Distances::Matrix(dm), items, params).unwrap();
    ///
    /// let mut sol = TtpSolution::new(vec![0, 1, 2], vec![None, None]);
    /// evaluate(&instance, &mut sol);
    ///
    /// let mut rng = u_numflow::random::create_rng(42);
    /// let config = AnnealConfig::default().with_trials_per_temperature(20);
    /// let result = KnapsackAnnealer::run(&instance, sol, &config, &mut RngSampler::new(&mut rng));
    /// assert!(result.best.is_picked(0));
    /// assert!(!result.best.is_picked(1));
    /// ```
    pub fn run<P, S>(
        problem: &P,
        solution: TtpSolution,
        config: &AnnealConfig,
        sampler: &mut S,
    ) -> AnnealResult
    where
        P: ThiefProblem + ?Sized,
        S: TrialSampler + ?Sized,
    {
        Self::run_with_stop(problem, solution, config, sampler, &StopSignal::never())
    }

    /// Anneals the picking plan of `solution`, polling `stop` at the top of
    /// every temperature step.
    pub fn run_with_stop<P, S>(
        problem: &P,
        solution: TtpSolution,
        config: &AnnealConfig,
        sampler: &mut S,
        stop: &StopSignal,
    ) -> AnnealResult
    where
        P: ThiefProblem + ?Sized,
        S: TrialSampler + ?Sized,
    {
        config.validate().expect("invalid AnnealConfig");

        let num_items = problem.num_items();
        let trials_per_step = if num_items == 0 {
            0
        } else {
            config.trials_for(num_items)
        };
        debug!("knapsack annealing: {num_items} items, {trials_per_step} trials per temperature");

        let mut current = solution;
        let mut best = current.clone();
        let mut chain_energy = current.objective;

        let mut temperature = config.initial_temperature;
        let mut step = 0usize;
        let mut trials = 0u64;
        let mut skipped_infeasible = 0u64;
        let mut accepted_moves = 0u64;
        let mut improving_moves = 0u64;
        let mut cancelled = false;
        let mut objective_history = vec![best.objective];

        loop {
            if stop.should_stop() {
                cancelled = true;
                break;
            }

            for _ in 0..trials_per_step {
                trials += 1;
                let item = sampler.next_item(num_items);

                // Capacity is read from the live state after every commit.
                let Some(mv) = FlipMove::evaluate(problem, &current, item) else {
                    skipped_infeasible += 1;
                    continue;
                };

                let gap = mv.objective - chain_energy;
                if metropolis_accept(gap, temperature, sampler) {
                    accepted_moves += 1;
                    if gap > 0.0 {
                        improving_moves += 1;
                    }
                    chain_energy = mv.commit(problem, &mut current);
                    debug_assert!(current.remaining_capacity >= 0);
                }
            }

            if current.objective > best.objective {
                best = current.clone();
            }
            objective_history.push(best.objective);
            trace!(
                "knapsack step {step}: T={temperature:.4} ob={:.2} best={:.2}",
                current.objective,
                best.objective
            );

            temperature = config.cool(temperature, step);
            step += 1;
            if temperature <= config.min_temperature {
                break;
            }
        }

        evaluate(problem, &mut best);

        AnnealResult {
            best_objective: best.objective,
            best,
            trials,
            skipped_infeasible,
            accepted_moves,
            improving_moves,
            temperature_steps: step,
            final_temperature: temperature,
            cancelled,
            objective_history,
        }
    }
}

//! Co-solver configuration.

use std::time::Duration;

use crate::knapsack::AnnealConfig;
use crate::local_search::TwoOptConfig;

/// Configuration for [`CoSolver`](super::CoSolver).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_ttp::cosolver::CoSolverConfig;
///
/// let config = CoSolverConfig::default()
///     .with_seed(7)
///     .with_max_rounds(20)
///     .with_time_limit(Duration::from_secs(600));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoSolverConfig {
    /// Knapsack annealing schedule used in every round.
    pub anneal: AnnealConfig,

    /// Settings for the built-in 2-opt tour optimizer.
    pub two_opt: TwoOptConfig,

    /// Maximum number of rounds (0 = until a round fails to improve).
    pub max_rounds: usize,

    /// Wall-clock budget. Expiry is treated like cancellation.
    pub time_limit: Option<Duration>,

    /// Random seed for reproducibility. `None` draws one at random.
    pub seed: Option<u64>,
}

impl CoSolverConfig {
    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_two_opt(mut self, two_opt: TwoOptConfig) -> Self {
        self.two_opt = two_opt;
        self
    }

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration and its nested parts.
    pub fn validate(&self) -> Result<(), String> {
        self.anneal.validate()?;
        self.two_opt.validate()?;
        if self.time_limit == Some(Duration::ZERO) {
            return Err("time_limit must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CoSolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_rounds, 0);
        assert!(config.seed.is_none());
        assert!(config.time_limit.is_none());
    }

    #[test]
    fn test_nested_errors_surface() {
        let config =
            CoSolverConfig::default().with_anneal(AnnealConfig::default().with_min_temperature(0.0));
        assert!(config.validate().is_err());

        let config = CoSolverConfig::default().with_two_opt(TwoOptConfig::default().with_neighborhood(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_time_limit_rejected() {
        let config = CoSolverConfig::default().with_time_limit(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}

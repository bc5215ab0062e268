//! Knapsack annealing configuration.

use u_metaheur::sa::CoolingSchedule;

/// Trials per item per temperature step, by instance size.
///
/// Small instances get proportionally more trials so the absolute work
/// stays reasonable across benchmark sizes.
///
/// # Examples
///
/// ```
/// use u_ttp::knapsack::trial_factor;
///
/// assert_eq!(trial_factor(279), 1000.0);
/// assert_eq!(trial_factor(4000), 50.0);
/// assert_eq!(trial_factor(250_000), 0.03);
/// ```
pub fn trial_factor(num_items: usize) -> f64 {
    match num_items {
        0..500 => 1000.0,
        500..1000 => 100.0,
        1000..5000 => 50.0,
        5000..20000 => 10.0,
        20000..100000 => 1.0,
        100000..200000 => 0.04,
        _ => 0.03,
    }
}

/// Configuration for [`KnapsackAnnealer`](super::KnapsackAnnealer).
///
/// Defaults reproduce the standard schedule: start at 100, stop once the
/// temperature reaches 1, geometric cooling by 0.95, trial count from
/// [`trial_factor`].
///
/// # Examples
///
/// ```
/// use u_metaheur::sa::CoolingSchedule;
/// use u_ttp::knapsack::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(50.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_trials_per_temperature(1_000);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.trials_for(10), 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct AnnealConfig {
    /// Temperature of the first step.
    pub initial_temperature: f64,

    /// The schedule ends once the temperature drops to this value.
    pub min_temperature: f64,

    /// Cooling schedule applied after every temperature step.
    pub cooling: CoolingSchedule,

    /// Overrides the per-step trial count derived from [`trial_factor`].
    pub trials_per_temperature: Option<u64>,

    /// Number of steps over which `CoolingSchedule::Linear` reaches the floor.
    pub linear_steps: usize,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1.0,
            cooling: CoolingSchedule::Geometric { alpha: 0.95 },
            trials_per_temperature: None,
            linear_steps: 100,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_trials_per_temperature(mut self, trials: u64) -> Self {
        self.trials_per_temperature = Some(trials);
        self
    }

    pub fn with_linear_steps(mut self, steps: usize) -> Self {
        self.linear_steps = steps;
        self
    }

    /// Trials per temperature step for an instance with `num_items` items.
    pub fn trials_for(&self, num_items: usize) -> u64 {
        self.trials_per_temperature
            .unwrap_or_else(|| (num_items as f64 * trial_factor(num_items)).round() as u64)
    }

    /// Next temperature after step `step` (0-based).
    pub fn cool(&self, temperature: f64, step: usize) -> f64 {
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::Linear => {
                let t = self.initial_temperature
                    - (step + 1) as f64 * (self.initial_temperature - self.min_temperature)
                        / self.linear_steps as f64;
                t.max(self.min_temperature)
            }
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(format!("lundy-mees beta must be positive, got {beta}"));
                }
            }
            CoolingSchedule::Linear => {
                if self.linear_steps == 0 {
                    return Err("linear_steps must be positive for linear cooling".into());
                }
            }
        }
        Ok(())
    }
}

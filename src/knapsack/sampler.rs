//! Random draws consumed by the annealer.

use rand::Rng;

/// Source of the two random decisions made per annealing trial: which item
/// to flip, and the uniform draw for the Metropolis test.
///
/// Abstracted so a fixed sequence of draws can be replayed.
pub trait TrialSampler {
    /// Uniform item index in `0..num_items`. `num_items` is never zero.
    fn next_item(&mut self, num_items: usize) -> usize;

    /// Uniform draw in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

/// [`TrialSampler`] backed by any [`rand::Rng`].
///
/// # Examples
///
/// ```
/// use u_ttp::knapsack::{RngSampler, TrialSampler};
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let mut sampler = RngSampler::new(&mut rng);
/// assert!(sampler.next_item(10) < 10);
/// let u = sampler.next_uniform();
/// assert!((0.0..1.0).contains(&u));
/// ```
pub struct RngSampler<'a, R: Rng> {
    rng: &'a mut R,
}

impl<'a, R: Rng> RngSampler<'a, R> {
    /// Wraps `rng`.
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TrialSampler for RngSampler<'_, R> {
    fn next_item(&mut self, num_items: usize) -> usize {
        self.rng.random_range(0..num_items)
    }

    fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Metropolis acceptance test for a maximization move.
///
/// Accepts unconditionally when `gap > 0`. Otherwise draws a uniform value
/// and accepts if `exp(gap / temperature)` exceeds it, so `gap == 0` is
/// always accepted. No draw is consumed for improving moves.
pub fn metropolis_accept<S: TrialSampler + ?Sized>(
    gap: f64,
    temperature: f64,
    sampler: &mut S,
) -> bool {
    gap > 0.0 || (gap / temperature).exp() > sampler.next_uniform()
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    struct Fixed(f64);

    impl TrialSampler for Fixed {
        fn next_item(&mut self, _num_items: usize) -> usize {
            0
        }
        fn next_uniform(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_improving_always_accepted() {
        let mut s = Fixed(0.999_999);
        assert!(metropolis_accept(1e-9, 1e-6, &mut s));
        assert!(metropolis_accept(50.0, 1.0, &mut s));
    }

    #[test]
    fn test_equal_energy_always_accepted() {
        let mut s = Fixed(0.999_999_999);
        assert!(metropolis_accept(0.0, 1.0, &mut s));
        assert!(metropolis_accept(0.0, 1e-12, &mut s));
    }

    #[test]
    fn test_worsening_compared_with_draw() {
        // exp(-ln 2) = 0.5
        let gap = -std::f64::consts::LN_2;
        assert!(metropolis_accept(gap, 1.0, &mut Fixed(0.49)));
        assert!(!metropolis_accept(gap, 1.0, &mut Fixed(0.51)));
    }

    #[test]
    fn test_acceptance_frequency_matches_boltzmann() {
        let mut rng = create_rng(42);
        let mut sampler = RngSampler::new(&mut rng);
        let temperature: f64 = 10.0;
        for gap in [-2.0, -10.0, -25.0] {
            let expected = (gap / temperature).exp();
            let n = 40_000;
            let hits = (0..n)
                .filter(|_| metropolis_accept(gap, temperature, &mut sampler))
                .count();
            let freq = hits as f64 / n as f64;
            assert!(
                (freq - expected).abs() < 0.015,
                "gap {gap}: frequency {freq} vs expected {expected}"
            );
        }
    }

    #[test]
    fn test_rng_sampler_covers_range() {
        let mut rng = create_rng(7);
        let mut sampler = RngSampler::new(&mut rng);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[sampler.next_item(5)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

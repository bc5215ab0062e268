//! Cooperative stop signal shared by the solvers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tells a running solver when to wind down.
///
/// Combines an externally settable cancellation flag with an optional
/// wall-clock deadline. Solvers poll [`StopSignal::should_stop`] at fixed
/// checkpoints and return their best result when it fires.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use u_ttp::stop::StopSignal;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let stop = StopSignal::from_flag(Some(flag.clone()));
/// assert!(!stop.should_stop());
/// flag.store(true, Ordering::Relaxed);
/// assert!(stop.should_stop());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    /// A signal driven by an optional cancellation flag.
    pub fn from_flag(flag: Option<Arc<AtomicBool>>) -> Self {
        Self {
            flag,
            deadline: None,
        }
    }

    /// Also fire once `limit` has elapsed from now.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    /// Returns `true` once the flag is set or the deadline has passed.
    pub fn should_stop(&self) -> bool {
        if let Some(ref flag) = self.flag {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_fires() {
        assert!(!StopSignal::never().should_stop());
    }

    #[test]
    fn test_flag_preset() {
        let stop = StopSignal::from_flag(Some(Arc::new(AtomicBool::new(true))));
        assert!(stop.should_stop());
    }

    #[test]
    fn test_zero_time_limit_fires() {
        let stop = StopSignal::never().with_time_limit(Duration::ZERO);
        assert!(stop.should_stop());
    }

    #[test]
    fn test_long_time_limit_does_not_fire() {
        let stop = StopSignal::from_flag(None).with_time_limit(Duration::from_secs(3600));
        assert!(!stop.should_stop());
    }
}

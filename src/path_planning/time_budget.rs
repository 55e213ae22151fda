//! Wall-clock budget shared by the planning phases
//!
//! The budget never blocks or interrupts anything. Each phase asks how much
//! time is left at its own checkpoints and stops producing work once its
//! threshold has been crossed.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    start: Instant,
    total: Duration,
}

impl TimeBudget {
    /// Start the clock now
    pub fn new(total: Duration) -> Self {
        Self::starting_at(Instant::now(), total)
    }

    /// Out-of-range values saturate: NaN and negatives to zero, values too
    /// large for a `Duration` to `Duration::MAX`
    pub fn from_secs_f64(total_secs: f64) -> Self {
        let total = if total_secs > 0.0 {
            Duration::try_from_secs_f64(total_secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self::new(total)
    }

    pub fn starting_at(start: Instant, total: Duration) -> Self {
        Self { start, total }
    }

    pub fn total_secs(&self) -> f64 {
        self.total.as_secs_f64()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Configured budget minus elapsed time; negative once overrun
    pub fn remaining_secs(&self) -> f64 {
        self.total_secs() - self.elapsed().as_secs_f64()
    }

    /// True while strictly more than `fraction` of the budget remains
    pub fn has_more_than(&self, fraction: f64) -> bool {
        self.remaining_secs() > self.total_secs() * fraction
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_secs() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `None` when the monotonic clock has not been running for `ago` yet
    fn started_ago(ago: Duration) -> Option<Instant> {
        Instant::now().checked_sub(ago)
    }

    #[test]
    fn test_fresh_budget_has_time() {
        let budget = TimeBudget::from_secs_f64(60.0);
        assert!(!budget.is_exhausted());
        assert!(budget.has_more_than(0.5));
        assert!(budget.remaining_secs() <= 60.0);
    }

    #[test]
    fn test_overrun_budget_is_exhausted() {
        let Some(start) = started_ago(Duration::from_millis(50)) else {
            return;
        };
        let budget = TimeBudget::starting_at(start, Duration::from_millis(10));
        assert!(budget.is_exhausted());
        assert!(budget.remaining_secs() < 0.0);
        assert!(!budget.has_more_than(0.0));
    }

    #[test]
    fn test_fraction_thresholds() {
        let Some(start) = started_ago(Duration::from_secs(55)) else {
            return;
        };
        let budget = TimeBudget::starting_at(start, Duration::from_secs(100));
        // roughly 45 s of 100 s remain
        assert!(!budget.has_more_than(0.5));
        assert!(budget.has_more_than(0.4));
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_out_of_range_seconds_saturate() {
        let huge = TimeBudget::from_secs_f64(1e20);
        assert_eq!(huge.total_secs(), Duration::MAX.as_secs_f64());
        assert!(huge.has_more_than(0.5));
        assert!(!huge.is_exhausted());

        assert!(TimeBudget::from_secs_f64(f64::INFINITY).has_more_than(0.99));
        assert!(TimeBudget::from_secs_f64(-3.0).is_exhausted());
        assert!(TimeBudget::from_secs_f64(f64::NAN).is_exhausted());
    }

    #[test]
    fn test_zero_budget() {
        let budget = TimeBudget::new(Duration::ZERO);
        assert!(budget.is_exhausted());
        assert!(!budget.has_more_than(0.0));
    }
}

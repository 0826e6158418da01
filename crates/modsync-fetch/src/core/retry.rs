use std::time::Duration;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay before every retry.
    Fixed(Duration),
    /// `step * retry` before the n-th retry (1-indexed).
    Linear(Duration),
}

impl Backoff {
    /// Delay before retry number `retry` (1 = first retry).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Linear(step) => step.saturating_mul(retry.max(1)),
        }
    }
}

/// Bounded retry: one initial attempt plus up to `max_retries` more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff:     Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed(delay),
        }
    }

    pub fn linear(max_retries: u32, step: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Linear(step),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self { Self::fixed(0, Duration::ZERO) }

    pub fn max_attempts(&self) -> u32 { self.max_retries.saturating_add(1) }

    pub fn delay_before(&self, retry: u32) -> Duration { self.backoff.delay(retry) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay_is_constant() {
        let policy = RetryPolicy::fixed(3, Duration::from_secs(1));
        for retry in 1..=3 {
            assert_eq!(policy.delay_before(retry), Duration::from_secs(1));
        }
    }

    #[test]
    fn test_linear_delay_grows_by_step() {
        let policy = RetryPolicy::linear(3, Duration::from_secs(1));
        assert_eq!(policy.delay_before(1), Duration::from_secs(1));
        assert_eq!(policy.delay_before(2), Duration::from_secs(2));
        assert_eq!(policy.delay_before(3), Duration::from_secs(3));
    }

    #[test]
    fn test_linear_delay_overflow_protection() {
        let policy = RetryPolicy::linear(3, Duration::from_secs(u64::MAX / 2));
        assert!(policy.delay_before(3) > Duration::ZERO);
    }

    #[test]
    fn test_max_attempts_counts_initial_attempt() {
        assert_eq!(RetryPolicy::linear(3, Duration::ZERO).max_attempts(), 4);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }
}

use std::time::Duration;

/// Full retry schedule for throttled control-plane calls.
///
/// Attempt 0 is the initial call and carries no delay; attempt `n` waits
/// `initial_delay_ms * multiplier^(n-1)`, capped at `max_delay_ms`, with up
/// to ±25% jitter derived from the system clock. The schedule is pure data;
/// sleeping and retry classification live with the SDK adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub use_jitter: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 8,
            initial_delay_ms: 250,
            max_delay_ms: 20_000,
            multiplier: 2.0,
            use_jitter: true,
        }
    }
}

impl BackoffPolicy {
    /// Schedule that retries immediately. Keeps retry-loop tests fast.
    pub fn zero_delay() -> Self {
        Self {
            initial_delay_ms: 0,
            max_delay_ms: 0,
            use_jitter: false,
            ..Self::default()
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32 - 1);
        let capped = base.min(self.max_delay_ms as f64);

        let delay_ms = if self.use_jitter {
            let jitter_range = capped * 0.25;
            let jitter = (clock_unit_interval() * jitter_range * 2.0) - jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(delay_ms as u64)
    }
}

/// Pseudo-random value in [0, 1) sourced from the sub-second clock.
fn clock_unit_interval() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (f64::from(nanos) / f64::from(u32::MAX)).fract()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_zero_carries_no_delay() {
        assert_eq!(
            BackoffPolicy::default().delay_for_attempt(0),
            Duration::ZERO
        );
    }

    #[test]
    fn delays_double_without_jitter() {
        let policy = BackoffPolicy {
            use_jitter: false,
            ..BackoffPolicy::default()
        };

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(2_000));
    }

    #[test]
    fn delays_cap_at_schedule_maximum() {
        let policy = BackoffPolicy {
            use_jitter: false,
            ..BackoffPolicy::default()
        };

        assert_eq!(policy.delay_for_attempt(8), Duration::from_millis(20_000));
        assert_eq!(policy.delay_for_attempt(30), Duration::from_millis(20_000));
    }

    #[test]
    fn jittered_delay_stays_within_quarter_of_base() {
        let policy = BackoffPolicy::default();

        let delay = policy.delay_for_attempt(3).as_millis() as f64;
        assert!(delay >= 750.0, "delay {delay} below jitter floor");
        assert!(delay <= 1_250.0, "delay {delay} above jitter ceiling");
    }

    #[test]
    fn zero_delay_schedule_never_sleeps() {
        let policy = BackoffPolicy::zero_delay();
        for attempt in 0..=policy.max_retries {
            assert_eq!(policy.delay_for_attempt(attempt), Duration::ZERO);
        }
    }
}

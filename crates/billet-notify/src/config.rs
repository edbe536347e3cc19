//! Notifier configuration: queue size and delivery retry policy.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the notifier retries a failed delivery.
///
/// The delay before attempt `n + 1` is `base_delay * 2^(n - 1)`, capped at
/// `max_delay`, then randomized by up to `jitter` of itself so that sinks
/// recovering from an outage aren't hit by every retry at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total delivery attempts, including the first. Minimum 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Fraction (0.0–1.0) of each delay that is randomized.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries once and never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Clamp out-of-range values so the policy is safe to use.
    ///
    /// Called by [`spawn_notifier`](crate::spawn_notifier). Rules:
    /// - `max_attempts` raised to at least 1.
    /// - `jitter` clamped to `0.0..=1.0` (NaN becomes 0).
    /// - `base_delay` forced ≤ `max_delay`.
    pub fn validated(mut self) -> Self {
        if self.max_attempts == 0 {
            warn!("retry max_attempts is 0, using 1");
            self.max_attempts = 1;
        }
        if self.jitter.is_nan() {
            self.jitter = 0.0;
        }
        self.jitter = self.jitter.clamp(0.0, 1.0);
        if self.base_delay > self.max_delay {
            warn!(
                base_ms = self.base_delay.as_millis() as u64,
                max_ms = self.max_delay.as_millis() as u64,
                "retry base_delay exceeds max_delay, clamping"
            );
            self.base_delay = self.max_delay;
        }
        self
    }

    /// Delay before the next attempt, without jitter, after `failed`
    /// attempts have failed (1-based).
    pub fn backoff(&self, failed: u32) -> Duration {
        let exp = failed.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }

    /// [`backoff`](Self::backoff) with up to `jitter` of it shaved off at
    /// random. Never exceeds the un-jittered delay.
    pub fn delay_for(&self, failed: u32) -> Duration {
        let delay = self.backoff(failed);
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let cut = rand::rng().random_range(0.0..=self.jitter);
        delay.mul_f64(1.0 - cut)
    }
}

/// Full configuration for the notifier task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Notifications buffered before [`Notifier::publish`](crate::Notifier::publish)
    /// starts dropping. Minimum 1.
    pub queue_capacity: usize,
    pub retry: RetryPolicy,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            retry: RetryPolicy::default(),
        }
    }
}

impl NotifierConfig {
    pub fn validated(mut self) -> Self {
        if self.queue_capacity == 0 {
            warn!("notifier queue_capacity is 0, using 1");
            self.queue_capacity = 1;
        }
        self.retry = self.retry.validated();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_fixes_zero_attempts_and_bad_jitter() {
        let policy = RetryPolicy {
            max_attempts: 0,
            jitter: 3.5,
            ..RetryPolicy::default()
        }
        .validated();

        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.jitter, 1.0);
    }

    #[test]
    fn test_validated_caps_base_at_max() {
        let policy = RetryPolicy {
            base_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(5),
            ..RetryPolicy::default()
        }
        .validated();

        assert_eq!(policy.base_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_doubles_until_cap() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            jitter: 0.0,
            ..RetryPolicy::default()
        };

        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(4), Duration::from_millis(500));
        assert_eq!(policy.backoff(40), Duration::from_millis(500));
    }

    #[test]
    fn test_jittered_delay_stays_in_range() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(1000),
            jitter: 0.5,
            ..RetryPolicy::default()
        };

        for _ in 0..100 {
            let d = policy.delay_for(1);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_zero_queue_capacity_is_raised() {
        let cfg = NotifierConfig {
            queue_capacity: 0,
            ..NotifierConfig::default()
        }
        .validated();
        assert_eq!(cfg.queue_capacity, 1);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let cfg: NotifierConfig =
            serde_json::from_str(r#"{"queue_capacity": 8}"#).unwrap();
        assert_eq!(cfg.queue_capacity, 8);
        assert_eq!(cfg.retry, RetryPolicy::default());
    }
}

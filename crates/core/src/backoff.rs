// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry delays after failed sync passes.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with a cap and additive jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    /// Delay before the first retry.
    pub initial: Duration,
    /// Upper bound on the un-jittered delay.
    pub max: Duration,
    /// Jitter as a fraction of the un-jittered delay, in `[0, 1]`.
    pub jitter_ratio: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(60),
            jitter_ratio: 0.2,
        }
    }
}

impl Backoff {
    /// Un-jittered delay after `attempt` consecutive failures (1-based).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let initial_ms = self.initial.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        let delay_ms = initial_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(std::cmp::min(delay_ms, max_ms))
    }

    /// Delay after `attempt` consecutive failures, jitter included.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let ratio = self.jitter_ratio.clamp(0.0, 1.0);
        let spread_ms = (base.as_millis() as f64 * ratio) as u64;
        if spread_ms == 0 {
            return base;
        }
        let jitter = rand::thread_rng().gen_range(0..=spread_ms);
        base + Duration::from_millis(jitter)
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;

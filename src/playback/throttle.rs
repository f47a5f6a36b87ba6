// SPDX-License-Identifier: MPL-2.0
//! Drop-based rate limiter for high-frequency engine notifications.

use std::time::{Duration, Instant};

/// Lets at most one update through per `interval` of wall-clock time.
///
/// Updates arriving inside the window are rejected, not deferred: the caller
/// drops them. No timer or thread is involved, only a timestamp comparison.
#[derive(Debug, Clone)]
pub struct UpdateThrottle {
    interval: Duration,
    last_applied: Option<Instant>,
}

impl UpdateThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_applied: None,
        }
    }

    /// Returns true and records `now` if an update may be applied.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let allowed = self
            .last_applied
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if allowed {
            self.last_applied = Some(now);
        }
        allowed
    }

    /// Forgets the last applied timestamp so the next update passes.
    pub fn reset(&mut self) {
        self.last_applied = None;
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

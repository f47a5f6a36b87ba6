// SPDX-License-Identifier: MPL-2.0
//! Single-shot, restartable dwell timer driven by UI ticks.
//!
//! The timer owns no thread. The UI context calls [`DwellTimer::poll_expired`]
//! from its periodic tick with the current instant; expiry is reported once.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellTimer {
    dwell: Duration,
    deadline: Option<Instant>,
}

impl DwellTimer {
    #[must_use]
    pub fn new(dwell: Duration) -> Self {
        Self {
            dwell,
            deadline: None,
        }
    }

    #[must_use]
    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Arms the timer to fire `dwell` after `now`, replacing any pending deadline.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.dwell);
    }

    /// Disarms the timer. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when `now` reaches the deadline, then stops.
    pub fn poll_expired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

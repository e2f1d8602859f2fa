//! Bounded polling
//!
//! A wait re-checks a condition at a fixed interval until it holds or the
//! timeout elapses. The condition is always checked at least once, and
//! once more at the deadline.

use std::time::{Duration, Instant};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};

/// Poll interval and timeout for a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl WaitPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn from_timeouts(timeouts: &Timeouts) -> Self {
        Self::new(timeouts.poll_interval(), timeouts.wait())
    }

    /// Same interval, different bound
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Start the clock for a wait described by `what`
    pub fn start(&self, what: impl Into<String>) -> Deadline {
        Deadline {
            what: what.into(),
            policy: *self,
            started: Instant::now(),
            attempts: 0,
        }
    }
}

/// A running wait
#[derive(Debug)]
pub struct Deadline {
    what: String,
    policy: WaitPolicy,
    started: Instant,
    attempts: u32,
}

impl Deadline {
    /// Sleep until the next check, or fail if the time is up
    ///
    /// Call after each unsuccessful check.
    pub async fn tick(&mut self) -> Result<()> {
        let elapsed = self.started.elapsed();
        if elapsed >= self.policy.timeout {
            tracing::debug!(
                attempts = self.attempts + 1,
                "Gave up waiting for {}",
                self.what
            );
            return Err(Error::wait_timeout(
                &self.what,
                self.policy.timeout.as_secs_f64().ceil() as u64,
            ));
        }

        let remaining = self.policy.timeout - elapsed;
        tokio::time::sleep(self.policy.interval.min(remaining)).await;
        self.attempts += 1;
        Ok(())
    }

    /// Number of sleeps taken so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

//! Bounded polling with a fixed interval.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// How long to keep asking for a status, and when to stop early.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy<S> {
    pub max_attempts: u32,
    pub interval: Duration,
    /// Returns true once a status needs no further polling.
    pub stop: fn(&S) -> bool,
}

/// Result of running a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult<S> {
    /// The stop predicate matched on `attempt` (1-based).
    Stopped { status: S, attempt: u32 },
    /// Every attempt ran without a stop; `last` is the final status seen.
    Exhausted { last: Option<S> },
}

impl<S> RetryPolicy<S> {
    pub fn new(max_attempts: u32, interval: Duration, stop: fn(&S) -> bool) -> Self {
        Self {
            max_attempts,
            interval,
            stop,
        }
    }

    /// Calls `fetch` up to `max_attempts` times, sleeping `interval` between
    /// attempts. An error from `fetch` ends polling immediately.
    pub async fn run<E, F, Fut>(&self, mut fetch: F) -> Result<PollResult<S>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<S, E>>,
    {
        let mut last = None;

        for attempt in 1..=self.max_attempts {
            let status = fetch(attempt).await?;
            if (self.stop)(&status) {
                return Ok(PollResult::Stopped { status, attempt });
            }
            last = Some(status);

            if attempt < self.max_attempts {
                debug!(attempt, max_attempts = self.max_attempts, "Not done yet, waiting");
                tokio::time::sleep(self.interval).await;
            }
        }

        Ok(PollResult::Exhausted { last })
    }
}

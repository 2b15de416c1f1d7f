//! Client-imposed polling budget.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::FoundryError;

/// Outcome of a single status check.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep<T> {
    Ready(T),
    Pending,
}

/// How often, and how many times, to check a remote status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks.
    pub interval: Duration,
    /// Maximum number of status checks (including the first).
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 300,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Reject budgets that could never observe a status.
    pub fn validate(&self) -> Result<(), FoundryError> {
        if self.max_attempts == 0 {
            return Err(FoundryError::Configuration(
                "poll max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Sleep before the next check, unless `attempt` was the last one.
    pub async fn pause_after(&self, attempt: u32) {
        if attempt + 1 < self.max_attempts && !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Error reported once the budget is spent.
    pub fn exhausted(&self, started: Instant) -> FoundryError {
        FoundryError::Timeout {
            attempts: self.max_attempts,
            waited_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Call `check` until it reports [`PollStep::Ready`] or the budget runs out.
    pub async fn until_ready<F, Fut, T>(&self, mut check: F) -> Result<T, FoundryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollStep<T>, FoundryError>>,
    {
        self.validate()?;
        let started = Instant::now();

        for attempt in 0..self.max_attempts {
            if let PollStep::Ready(value) = check().await? {
                return Ok(value);
            }
            tracing::debug!(
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                "Still pending"
            );
            self.pause_after(attempt).await;
        }

        Err(self.exhausted(started))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn returns_once_ready() {
        let policy = PollPolicy::new(Duration::from_millis(10), 5);
        let calls = Arc::new(AtomicU32::new(0));

        let value = policy
            .until_ready(|| {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Ok(PollStep::Pending)
                    } else {
                        Ok(PollStep::Ready("done"))
                    }
                }
            })
            .await
            .expect("ready");

        assert_eq!(value, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_max_attempts() {
        let policy = PollPolicy::new(Duration::from_millis(10), 3);
        let calls = Arc::new(AtomicU32::new(0));

        let err = policy
            .until_ready(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<PollStep<()>, FoundryError>(PollStep::Pending)
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, FoundryError::Timeout { attempts: 3, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn check_errors_propagate_immediately() {
        let policy = PollPolicy::new(Duration::ZERO, 5);
        let err = policy
            .until_ready(|| async { Err::<PollStep<()>, _>(FoundryError::NotFound("x".into())) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn zero_attempts_is_a_configuration_error() {
        let policy = PollPolicy::new(Duration::ZERO, 0);
        assert!(matches!(policy.validate(), Err(FoundryError::Configuration(_))));
    }
}

//! Timeout helper for single service calls.

use std::future::Future;
use std::time::Duration;

use crate::error::FoundryError;

/// Wrap a future with a wall-clock timeout.
///
/// The elapsed budget is reported as a single attempt.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, FoundryError>>,
) -> Result<T, FoundryError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(FoundryError::Timeout {
            attempts: 1,
            waited_ms: duration.as_millis() as u64,
        }),
    }
}

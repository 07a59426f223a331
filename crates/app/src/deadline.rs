//! Per-call deadlines for storage and cache operations.

use std::future::Future;
use std::time::Duration;

use eventhub_domain::error::EventHubError;

/// Run `call`, failing with [`EventHubError::Timeout`] once `limit` elapses.
///
/// On expiry the call is dropped; whatever the store committed before that
/// point stays committed, nothing more is assumed.
///
/// # Errors
///
/// Returns the error of `call`, or [`EventHubError::Timeout`] naming
/// `operation`.
pub async fn bounded<T, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, EventHubError>
where
    F: Future<Output = Result<T, EventHubError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(EventHubError::Timeout { operation }),
    }
}

/// Whether a write that produced `result` may have reached the store.
///
/// True on success and on timeout, where the outcome is unknown. Callers use
/// it to decide whether cached snapshots must be invalidated.
#[must_use]
pub fn may_have_committed<T>(result: &Result<T, EventHubError>) -> bool {
    matches!(result, Ok(_) | Err(EventHubError::Timeout { .. }))
}

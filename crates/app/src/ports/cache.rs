//! Cache port — disposable snapshots of single events.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use eventhub_domain::error::EventHubError;
use eventhub_domain::event::Event;
use eventhub_domain::id::EventId;

/// Cache key for the snapshot of event `id`.
#[must_use]
pub fn cache_key(id: EventId) -> String {
    format!("event:{id}")
}

/// Keyed, TTL-bounded store of [`Event`] snapshots.
///
/// Entries are never authoritative. A miss and an error are equally safe
/// for callers; errors are reported so they can be logged.
pub trait EventCache {
    /// Fetch the snapshot for `id`, `None` on miss or expiry.
    fn get(&self, id: EventId)
    -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send;

    /// Store a snapshot that expires after `ttl`.
    fn set(
        &self,
        event: &Event,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Drop the snapshot for `id`. Dropping a missing entry is not an error.
    fn delete(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Whether a live snapshot exists for `id`.
    fn exists(&self, id: EventId) -> impl Future<Output = Result<bool, EventHubError>> + Send;
}

impl<T: EventCache + Send + Sync> EventCache for Arc<T> {
    fn get(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        (**self).get(id)
    }

    fn set(
        &self,
        event: &Event,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).set(event, ttl)
    }

    fn delete(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).delete(id)
    }

    fn exists(&self, id: EventId) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        (**self).exists(id)
    }
}

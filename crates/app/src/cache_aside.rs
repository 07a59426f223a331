//! Cache-aside policy for single-event reads.
//!
//! Reads try the cache first and fall through to the store on a miss or on
//! any cache failure, then repopulate the cache. Writes go to the store and
//! then invalidate. Cache failures never fail the surrounding operation: a
//! failed invalidation leaves a stale snapshot that lives at most one TTL.
//!
//! A successful invalidation can also be undone by a concurrent read. A read
//! that loaded the event before the write committed may store its snapshot
//! after the write's invalidation ran. That snapshot is equally bounded by
//! the TTL.

use std::future::Future;
use std::time::Duration;

use eventhub_domain::error::EventHubError;
use eventhub_domain::event::Event;
use eventhub_domain::id::EventId;

use crate::config::ServiceConfig;
use crate::deadline::bounded;
use crate::ports::EventCache;

/// Wraps an [`EventCache`] with the read-through / invalidate-on-write policy.
pub struct CacheAside<C> {
    cache: C,
    ttl: Duration,
    call_timeout: Duration,
}

impl<C: EventCache> CacheAside<C> {
    /// Apply the policy to `cache` using the TTL and deadline from `config`.
    pub fn new(cache: C, config: ServiceConfig) -> Self {
        Self {
            cache,
            ttl: config.cache_ttl,
            call_timeout: config.call_timeout,
        }
    }

    /// Return the cached snapshot of `id`, or load it with `load` and cache it.
    ///
    /// # Errors
    ///
    /// Only errors from `load` are returned; cache errors are logged.
    pub async fn get_or_load<F, Fut>(&self, id: EventId, load: F) -> Result<Event, EventHubError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Event, EventHubError>>,
    {
        match bounded(self.call_timeout, "cache.get", self.cache.get(id)).await {
            Ok(Some(event)) => {
                tracing::debug!(event_id = %id, "event served from cache");
                return Ok(event);
            }
            Ok(None) => tracing::debug!(event_id = %id, "event cache miss"),
            Err(err) => {
                tracing::warn!(%err, event_id = %id, "cache read failed, falling back to store");
            }
        }

        let event = load().await?;

        match bounded(
            self.call_timeout,
            "cache.set",
            self.cache.set(&event, self.ttl),
        )
        .await
        {
            Ok(()) => tracing::debug!(event_id = %id, "event added to cache"),
            Err(err) => tracing::warn!(%err, event_id = %id, "failed to add event to cache"),
        }

        Ok(event)
    }

    /// Drop the snapshot of `id` after a write that committed or may have.
    pub async fn invalidate(&self, id: EventId) {
        if let Err(err) = bounded(self.call_timeout, "cache.delete", self.cache.delete(id)).await {
            tracing::warn!(
                %err,
                event_id = %id,
                ttl_secs = self.ttl.as_secs(),
                "cache invalidation failed, snapshot may stay stale until it expires"
            );
        }
    }
}

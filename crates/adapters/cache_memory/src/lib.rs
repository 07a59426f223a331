//! # eventhub-adapter-cache-memory
//!
//! In-process implementation of the `EventCache` port.
//!
//! Entries expire on tokio's clock, so a paused test runtime can step over a
//! TTL without sleeping. Expired entries are invisible to reads and are
//! swept when the map grows past its soft limit.
//!
//! ## Dependency rule
//! Depends on `eventhub-app` (for the port trait) and `eventhub-domain`.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use eventhub_app::ports::EventCache;
use eventhub_domain::error::EventHubError;
use eventhub_domain::event::Event;
use eventhub_domain::id::EventId;

const DEFAULT_SOFT_LIMIT: usize = 10_000;

/// Expiry used when `now + ttl` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone)]
struct Entry {
    event: Event,
    expires_at: Instant,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl).unwrap_or(now + FAR_FUTURE)
}

/// Event cache held in a map behind an async lock.
#[derive(Debug)]
pub struct InMemoryEventCache {
    entries: RwLock<HashMap<EventId, Entry>>,
    soft_limit: usize,
}

impl Default for InMemoryEventCache {
    fn default() -> Self {
        Self::with_soft_limit(DEFAULT_SOFT_LIMIT)
    }
}

impl InMemoryEventCache {
    /// Create an empty cache that sweeps expired entries once it holds
    /// `soft_limit` of them.
    #[must_use]
    pub fn with_soft_limit(soft_limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            soft_limit,
        }
    }

    /// Drop every expired entry and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl EventCache for InMemoryEventCache {
    fn get(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        async move {
            let entries = self.entries.read().await;
            Ok(entries
                .get(&id)
                .filter(|entry| entry.is_fresh(Instant::now()))
                .map(|entry| entry.event.clone()))
        }
    }

    fn set(
        &self,
        event: &Event,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let entry = Entry {
            event: event.clone(),
            expires_at: expiry(Instant::now(), ttl),
        };
        async move {
            let mut entries = self.entries.write().await;
            if entries.len() >= self.soft_limit {
                let now = Instant::now();
                entries.retain(|_, entry| entry.is_fresh(now));
            }
            entries.insert(entry.event.id, entry);
            Ok(())
        }
    }

    fn delete(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        async move {
            self.entries.write().await.remove(&id);
            Ok(())
        }
    }

    fn exists(&self, id: EventId) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        async move {
            let entries = self.entries.read().await;
            Ok(entries
                .get(&id)
                .is_some_and(|entry| entry.is_fresh(Instant::now())))
        }
    }
}

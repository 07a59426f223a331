//! # eventhub-adapter-cache-redis
//!
//! `Redis` implementation of the `EventCache` port.
//!
//! Snapshots are stored as JSON under `event:{id}` with `SETEX`, so `Redis`
//! expires them on its own. Every instance of the service sharing one `Redis`
//! sees the same invalidations.
//!
//! ## Dependency rule
//! Depends on `eventhub-app` (for the port trait and key scheme) and
//! `eventhub-domain`.

use std::future::Future;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use eventhub_app::ports::EventCache;
use eventhub_app::ports::cache::cache_key;
use eventhub_domain::error::EventHubError;
use eventhub_domain::event::Event;
use eventhub_domain::id::EventId;

/// Errors originating from the `Redis` cache layer.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A command or connection failed.
    #[error("redis error")]
    Redis(#[from] redis::RedisError),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot serialization error")]
    Json(#[from] serde_json::Error),
}

impl From<CacheError> for EventHubError {
    fn from(err: CacheError) -> Self {
        Self::Cache(Box::new(err))
    }
}

/// Whole seconds for `SETEX`, rounded up and never zero.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

fn encode(event: &Event) -> Result<Vec<u8>, CacheError> {
    Ok(serde_json::to_vec(event)?)
}

fn decode(bytes: &[u8]) -> Result<Event, CacheError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// `Redis`-backed event cache.
///
/// Clones share the same [`ConnectionManager`], which reconnects on its own
/// after a dropped connection.
#[derive(Clone)]
pub struct RedisEventCache {
    conn_manager: ConnectionManager,
}

impl RedisEventCache {
    /// Connect to the `Redis` server at `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the URL is malformed or the initial
    /// connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn_manager = ConnectionManager::new(client).await?;
        tracing::info!("redis event cache connected");
        Ok(Self { conn_manager })
    }
}

impl EventCache for RedisEventCache {
    fn get(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        let mut conn = self.conn_manager.clone();
        async move {
            let bytes: Option<Vec<u8>> = conn.get(cache_key(id)).await.map_err(CacheError::from)?;
            match bytes {
                Some(bytes) => Ok(Some(decode(&bytes)?)),
                None => Ok(None),
            }
        }
    }

    fn set(
        &self,
        event: &Event,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut conn = self.conn_manager.clone();
        let key = cache_key(event.id);
        let payload = encode(event);
        async move {
            let payload = payload?;
            let _: () = conn
                .set_ex(key, payload, ttl_seconds(ttl))
                .await
                .map_err(CacheError::from)?;
            Ok(())
        }
    }

    fn delete(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut conn = self.conn_manager.clone();
        async move {
            let _removed: i64 = conn.del(cache_key(id)).await.map_err(CacheError::from)?;
            Ok(())
        }
    }

    fn exists(&self, id: EventId) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        let mut conn = self.conn_manager.clone();
        async move {
            let exists: bool = conn.exists(cache_key(id)).await.map_err(CacheError::from)?;
            Ok(exists)
        }
    }
}

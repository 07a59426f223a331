//! Event service — lifecycle of events, with cache-aside single reads.

use std::time::Duration;

use eventhub_domain::error::{EventHubError, NotFoundError};
use eventhub_domain::event::{Event, EventFilter, EventUpdate, NewEvent};
use eventhub_domain::id::EventId;

use crate::cache_aside::CacheAside;
use crate::config::ServiceConfig;
use crate::deadline::{bounded, may_have_committed};
use crate::ports::{EventCache, EventRepository};

/// Application service for event CRUD.
///
/// Only [`get_event`](Self::get_event) goes through the cache; collection
/// reads always hit the store.
pub struct EventService<R, C> {
    repo: R,
    cache: CacheAside<C>,
    call_timeout: Duration,
}

impl<R: EventRepository, C: EventCache> EventService<R, C> {
    /// Create a new service over `repo`, caching single reads in `cache`.
    pub fn new(repo: R, cache: C, config: ServiceConfig) -> Self {
        Self {
            repo,
            cache: CacheAside::new(cache, config),
            call_timeout: config.call_timeout,
        }
    }

    /// Validate and persist a new event.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] if a field rule fails, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, event), fields(title = %event.title))]
    pub async fn create_event(&self, event: NewEvent) -> Result<EventId, EventHubError> {
        event.validate()?;
        let id = bounded(self.call_timeout, "events.create", self.repo.create(event))
            .await
            .inspect_err(|err| tracing::error!(%err, "failed to create event"))?;
        tracing::info!(event_id = %id, "event created");
        Ok(id)
    }

    /// Fetch one event, from cache when a fresh snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`] when no event with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: EventId) -> Result<Event, EventHubError> {
        self.cache.get_or_load(id, || self.load(id)).await
    }

    async fn load(&self, id: EventId) -> Result<Event, EventHubError> {
        bounded(self.call_timeout, "events.get", self.repo.get_by_id(id))
            .await?
            .ok_or_else(|| NotFoundError::event(id).into())
    }

    /// List events matching `filter`, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> Result<Vec<Event>, EventHubError> {
        let result = match filter {
            EventFilter::All => bounded(self.call_timeout, "events.list", self.repo.get_all()).await,
            EventFilter::Creator(creator) => {
                bounded(
                    self.call_timeout,
                    "events.list_by_creator",
                    self.repo.get_all_by_creator(creator),
                )
                .await
            }
            EventFilter::Status(status) => {
                bounded(
                    self.call_timeout,
                    "events.list_by_status",
                    self.repo.get_all_by_status(status),
                )
                .await
            }
        };
        result.inspect_err(|err| tracing::error!(%err, "failed to list events"))
    }

    /// Validate and apply an update, then drop the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] if a field rule fails or the new
    /// capacity is below the current attendance, [`EventHubError::NotFound`]
    /// when the event does not exist, or a storage error.
    #[tracing::instrument(skip(self, update), fields(event_id = %update.id))]
    pub async fn update_event(&self, update: EventUpdate) -> Result<(), EventHubError> {
        update.validate()?;
        let id = update.id;
        let result = bounded(self.call_timeout, "events.update", self.repo.update(update)).await;
        if may_have_committed(&result) {
            self.cache.invalidate(id).await;
        }
        match &result {
            Ok(()) => tracing::info!("event updated"),
            Err(err) => tracing::warn!(%err, "event update rejected"),
        }
        result
    }

    /// Delete an event and its registrations, then drop the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`] when the event does not exist, or
    /// a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId) -> Result<(), EventHubError> {
        let result = bounded(self.call_timeout, "events.delete", self.repo.delete_by_id(id)).await;
        if may_have_committed(&result) {
            self.cache.invalidate(id).await;
        }
        match &result {
            Ok(()) => tracing::info!("event deleted"),
            Err(err) => tracing::warn!(%err, "event delete rejected"),
        }
        result
    }
}

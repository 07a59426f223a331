//! Registration service — users joining and leaving events.
//!
//! Membership and the event's attendance counter change together through
//! the [`AttendanceLedger`]. The cached snapshot of the event is dropped
//! after every change so readers see the new attendance.

use std::time::Duration;

use eventhub_domain::error::{EventHubError, RegistrationError};
use eventhub_domain::event::Event;
use eventhub_domain::id::{EventId, UserId};
use eventhub_domain::registration::Registration;

use crate::cache_aside::CacheAside;
use crate::config::ServiceConfig;
use crate::deadline::{bounded, may_have_committed};
use crate::ports::{AttendanceLedger, EventCache, RegistrationRepository};

/// Application service for registrations.
pub struct RegistrationService<R, L, C> {
    registrations: R,
    ledger: L,
    cache: CacheAside<C>,
    call_timeout: Duration,
}

impl<R, L, C> RegistrationService<R, L, C>
where
    R: RegistrationRepository,
    L: AttendanceLedger,
    C: EventCache,
{
    /// Create a new service from its ports.
    pub fn new(registrations: R, ledger: L, cache: C, config: ServiceConfig) -> Self {
        Self {
            registrations,
            ledger,
            cache: CacheAside::new(cache, config),
            call_timeout: config.call_timeout,
        }
    }

    /// Register `user_id` for `event_id`, taking one seat.
    ///
    /// An existing registration is refused before capacity is considered.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::AlreadyRegistered`] when the pair exists
    /// - [`RegistrationError::MaxRegistered`] when the event is full
    /// - [`EventHubError::NotFound`] when the event does not exist
    /// - a storage error or timeout from the store
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, user_id: UserId, event_id: EventId) -> Result<(), EventHubError> {
        let registration = Registration::new(user_id, event_id);
        if self.is_registered(registration).await? {
            tracing::info!("user already registered");
            return Err(RegistrationError::AlreadyRegistered { user_id, event_id }.into());
        }

        let result = bounded(
            self.call_timeout,
            "registrations.admit",
            self.ledger.admit(registration),
        )
        .await;
        if may_have_committed(&result) {
            self.cache.invalidate(event_id).await;
        }
        match &result {
            Ok(()) => tracing::info!("user registered"),
            Err(err) => tracing::warn!(%err, "registration refused"),
        }
        result
    }

    /// Remove the registration of `user_id` for `event_id`, freeing a seat.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::NotRegistered`] when the pair does not exist
    /// - [`EventHubError::NotFound`] when the event vanished meanwhile
    /// - a storage error or timeout from the store
    #[tracing::instrument(skip(self))]
    pub async fn cancel_registration(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), EventHubError> {
        let registration = Registration::new(user_id, event_id);
        if !self.is_registered(registration).await? {
            tracing::info!("user not registered");
            return Err(RegistrationError::NotRegistered { user_id, event_id }.into());
        }

        let result = bounded(
            self.call_timeout,
            "registrations.release",
            self.ledger.release(registration),
        )
        .await;
        if may_have_committed(&result) {
            self.cache.invalidate(event_id).await;
        }
        match &result {
            Ok(()) => tracing::info!("registration cancelled"),
            Err(err) => tracing::warn!(%err, "cancellation failed"),
        }
        result
    }

    /// Events `user_id` is registered for, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_events_for_user(&self, user_id: UserId) -> Result<Vec<Event>, EventHubError> {
        bounded(
            self.call_timeout,
            "registrations.list_events",
            self.registrations.list_events_by_user(user_id),
        )
        .await
        .inspect_err(|err| tracing::error!(%err, "failed to list events for user"))
    }

    /// Users registered for `event_id`.
    ///
    /// An unknown event yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_users_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<UserId>, EventHubError> {
        bounded(
            self.call_timeout,
            "registrations.list_users",
            self.registrations.list_users_by_event(event_id),
        )
        .await
        .inspect_err(|err| tracing::error!(%err, "failed to list users for event"))
    }

    async fn is_registered(&self, registration: Registration) -> Result<bool, EventHubError> {
        bounded(
            self.call_timeout,
            "registrations.exists",
            self.registrations.exists(registration),
        )
        .await
        .inspect_err(|err| tracing::error!(%err, "failed to check registration"))
    }
}

//! Registration repository port — user ↔ event membership rows.

use std::future::Future;
use std::sync::Arc;

use eventhub_domain::error::EventHubError;
use eventhub_domain::event::Event;
use eventhub_domain::id::{EventId, UserId};
use eventhub_domain::registration::Registration;

/// Repository for membership rows.
///
/// Uniqueness of `(user_id, event_id)` is enforced by the store itself, so
/// [`create`](RegistrationRepository::create) stays correct under races.
pub trait RegistrationRepository {
    /// Whether the membership row exists.
    fn exists(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send;

    /// Insert a membership row.
    ///
    /// Fails with `AlreadyRegistered` when the pair exists and with
    /// `NotFound` when the event does not.
    fn create(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Delete a membership row; `NotFound` when absent.
    fn delete(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Users registered for `event_id`. Each user appears once.
    fn list_users_by_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<UserId>, EventHubError>> + Send;

    /// Events `user_id` is registered for, ordered like the event listings.
    fn list_events_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send;
}

impl<T: RegistrationRepository + Send + Sync> RegistrationRepository for Arc<T> {
    fn exists(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        (**self).exists(registration)
    }

    fn create(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).create(registration)
    }

    fn delete(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).delete(registration)
    }

    fn list_users_by_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<UserId>, EventHubError>> + Send {
        (**self).list_users_by_event(event_id)
    }

    fn list_events_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        (**self).list_events_by_user(user_id)
    }
}

//! Event repository port — persistence for events and their attendance counter.

use std::future::Future;
use std::sync::Arc;

use eventhub_domain::error::EventHubError;
use eventhub_domain::event::{Event, EventStatus, EventUpdate, NewEvent};
use eventhub_domain::id::{EventId, UserId};

/// Repository for persisting and querying [`Event`]s.
///
/// Collection reads are ordered by title, ties broken by insertion order.
pub trait EventRepository {
    /// Insert a new event and return the store-assigned id.
    fn create(&self, event: NewEvent)
    -> impl Future<Output = Result<EventId, EventHubError>> + Send;

    /// Get an event by its identifier.
    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send;

    /// Get every event.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send;

    /// Get every event created by `creator`.
    fn get_all_by_creator(
        &self,
        creator: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send;

    /// Get every event in `status`.
    fn get_all_by_status(
        &self,
        status: EventStatus,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send;

    /// Overwrite the mutable fields of an existing event.
    ///
    /// Fails with [`EventHubError::NotFound`] when the id is unknown and with
    /// a validation error when the new capacity is below the attendance.
    fn update(&self, update: EventUpdate)
    -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Delete an event and, by cascade, its registrations.
    fn delete_by_id(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Atomically add one attendee unless the event is full.
    ///
    /// Fails with `MaxRegistered` when full and `NotFound` when missing.
    fn increment_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Atomically remove one attendee; the counter never drops below zero.
    fn decrement_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;
}

impl<T: EventRepository + Send + Sync> EventRepository for Arc<T> {
    fn create(
        &self,
        event: NewEvent,
    ) -> impl Future<Output = Result<EventId, EventHubError>> + Send {
        (**self).create(event)
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        (**self).get_all()
    }

    fn get_all_by_creator(
        &self,
        creator: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        (**self).get_all_by_creator(creator)
    }

    fn get_all_by_status(
        &self,
        status: EventStatus,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        (**self).get_all_by_status(status)
    }

    fn update(
        &self,
        update: EventUpdate,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).update(update)
    }

    fn delete_by_id(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).delete_by_id(id)
    }

    fn increment_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).increment_attendance(id)
    }

    fn decrement_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).decrement_attendance(id)
    }
}

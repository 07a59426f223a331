//! Common error types used across the workspace.
//!
//! Every layer converts its own failures into [`EventHubError`] through
//! `#[from]` or an explicit `From` impl. Storage and cache failures are boxed
//! so that driver types never reach callers.

use crate::id::{EventId, UserId};

/// Boxed source error for infrastructure failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by every port and service.
#[derive(Debug, thiserror::Error)]
pub enum EventHubError {
    /// Input outside the accepted range.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The targeted record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A registration transition was refused.
    #[error("registration refused")]
    Registration(#[from] RegistrationError),

    /// Opaque storage failure (connection loss, decode failure, …).
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// Opaque cache failure. Services recover from these locally.
    #[error("cache error")]
    Cache(#[source] BoxError),

    /// A storage or cache call exceeded its deadline.
    #[error("{operation} timed out")]
    Timeout { operation: &'static str },
}

impl EventHubError {
    /// Whether this error means the targeted record is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must be between {min} and {max} characters, got {actual}")]
    TitleLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("description must be at least {min} characters, got {actual}")]
    DescriptionTooShort { min: usize, actual: usize },

    #[error("location must not be empty")]
    EmptyLocation,

    #[error("start time is required")]
    MissingStartTime,

    #[error("creator is required")]
    MissingCreator,

    #[error("max attendees must be between {min} and {max}, got {actual}")]
    CapacityOutOfRange { min: u32, max: u32, actual: u32 },

    #[error("max attendees {requested} is below the current attendance of {current}")]
    CapacityBelowAttendance { requested: u32, current: u32 },

    #[error("unknown event status `{0}`")]
    UnknownStatus(String),

    #[error("invalid identifier `{0}`")]
    InvalidId(String),

    #[error("filter by creator and by status cannot be combined")]
    ConflictingFilters,
}

/// A lookup targeted a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

impl NotFoundError {
    /// Not-found error for an event.
    #[must_use]
    pub fn event(id: EventId) -> Self {
        Self {
            entity: "Event",
            id: id.to_string(),
        }
    }

    /// Not-found error for a registration row.
    #[must_use]
    pub fn registration(user_id: UserId, event_id: EventId) -> Self {
        Self {
            entity: "Registration",
            id: format!("{user_id}/{event_id}"),
        }
    }
}

/// Refusals of the registration state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("user {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { user_id: UserId, event_id: EventId },

    #[error("user {user_id} is not registered for event {event_id}")]
    NotRegistered { user_id: UserId, event_id: EventId },

    #[error("event {event_id} has reached its maximum number of attendees")]
    MaxRegistered { event_id: EventId },
}

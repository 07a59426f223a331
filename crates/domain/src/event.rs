//! Event — a schedulable occurrence with a bounded attendee capacity.
//!
//! Three shapes exist:
//! - [`Event`] is the persisted record, including the attendance counter.
//! - [`NewEvent`] is a validated creation draft; the store assigns the id.
//! - [`EventUpdate`] overwrites every mutable field of an existing event.
//!
//! The attendance counter is never written through these shapes. It only
//! moves through the attendance ledger, one registration at a time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EventHubError, ValidationError};
use crate::id::{EventId, UserId};

/// UTC timestamp used for event start times.
pub type Timestamp = DateTime<Utc>;

pub const MIN_TITLE_LEN: usize = 5;
pub const MAX_TITLE_LEN: usize = 255;
pub const MIN_DESCRIPTION_LEN: usize = 5;
pub const MIN_ATTENDEES: u32 = 5;
pub const MAX_ATTENDEES: u32 = 1000;

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Ongoing,
    Completed,
    Cancelled,
    Postponed,
}

impl EventStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::Published,
        Self::Ongoing,
        Self::Completed,
        Self::Cancelled,
        Self::Postponed,
    ];

    /// Lowercase wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Postponed => "postponed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// A persisted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub starts_at: Timestamp,
    pub location: String,
    pub status: EventStatus,
    pub max_attendees: u32,
    pub current_attendance: u32,
    pub creator: UserId,
}

impl Event {
    /// Build an update that rewrites this event with its current values.
    #[must_use]
    pub fn to_update(&self) -> EventUpdate {
        EventUpdate {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            starts_at: self.starts_at,
            location: self.location.clone(),
            status: self.status,
            max_attendees: self.max_attendees,
        }
    }
}

/// Which collection of events to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Creator(UserId),
    Status(EventStatus),
}

fn validate_fields(
    title: &str,
    description: &str,
    location: &str,
    max_attendees: u32,
) -> Result<(), ValidationError> {
    let title_len = title.chars().count();
    if !(MIN_TITLE_LEN..=MAX_TITLE_LEN).contains(&title_len) {
        return Err(ValidationError::TitleLength {
            min: MIN_TITLE_LEN,
            max: MAX_TITLE_LEN,
            actual: title_len,
        });
    }
    let description_len = description.chars().count();
    if description_len < MIN_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooShort {
            min: MIN_DESCRIPTION_LEN,
            actual: description_len,
        });
    }
    if location.trim().is_empty() {
        return Err(ValidationError::EmptyLocation);
    }
    if !(MIN_ATTENDEES..=MAX_ATTENDEES).contains(&max_attendees) {
        return Err(ValidationError::CapacityOutOfRange {
            min: MIN_ATTENDEES,
            max: MAX_ATTENDEES,
            actual: max_attendees,
        });
    }
    Ok(())
}

/// Creation draft for an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub starts_at: Timestamp,
    pub location: String,
    pub status: EventStatus,
    pub max_attendees: u32,
    pub creator: UserId,
}

impl NewEvent {
    /// Create a builder for constructing a [`NewEvent`].
    #[must_use]
    pub fn builder() -> NewEventBuilder {
        NewEventBuilder::default()
    }

    /// Check field rules.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] when a field is out of range.
    pub fn validate(&self) -> Result<(), EventHubError> {
        validate_fields(
            &self.title,
            &self.description,
            &self.location,
            self.max_attendees,
        )?;
        Ok(())
    }

    /// Materialize the persisted record once the store has assigned an id.
    #[must_use]
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            starts_at: self.starts_at,
            location: self.location,
            status: self.status,
            max_attendees: self.max_attendees,
            current_attendance: 0,
            creator: self.creator,
        }
    }
}

/// Step-by-step builder for [`NewEvent`].
#[derive(Debug, Default)]
pub struct NewEventBuilder {
    title: Option<String>,
    description: Option<String>,
    starts_at: Option<Timestamp>,
    location: Option<String>,
    status: Option<EventStatus>,
    max_attendees: Option<u32>,
    creator: Option<UserId>,
}

impl NewEventBuilder {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn starts_at(mut self, starts_at: Timestamp) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn max_attendees(mut self, max_attendees: u32) -> Self {
        self.max_attendees = Some(max_attendees);
        self
    }

    #[must_use]
    pub fn creator(mut self, creator: UserId) -> Self {
        self.creator = Some(creator);
        self
    }

    /// Consume the builder, validate, and return a [`NewEvent`].
    ///
    /// Status defaults to [`EventStatus::Draft`].
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] if a required field is missing
    /// or a field is out of range.
    pub fn build(self) -> Result<NewEvent, EventHubError> {
        let starts_at = self.starts_at.ok_or(ValidationError::MissingStartTime)?;
        let creator = self.creator.ok_or(ValidationError::MissingCreator)?;
        let event = NewEvent {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            starts_at,
            location: self.location.unwrap_or_default(),
            status: self.status.unwrap_or(EventStatus::Draft),
            max_attendees: self.max_attendees.unwrap_or_default(),
            creator,
        };
        event.validate()?;
        Ok(event)
    }
}

/// Full overwrite of the mutable fields of an existing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUpdate {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub starts_at: Timestamp,
    pub location: String,
    pub status: EventStatus,
    pub max_attendees: u32,
}

impl EventUpdate {
    /// Check field rules.
    ///
    /// Whether `max_attendees` still covers the current attendance can only
    /// be decided by the store, atomically with the write.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] when a field is out of range.
    pub fn validate(&self) -> Result<(), EventHubError> {
        validate_fields(
            &self.title,
            &self.description,
            &self.location,
            self.max_attendees,
        )?;
        Ok(())
    }
}

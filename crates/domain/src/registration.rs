//! Registration — a user's membership in an event's attendee set.
//!
//! A registration has no attributes of its own: the existence of the
//! `(user_id, event_id)` pair is the whole fact.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, UserId};

/// Composite identity of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registration {
    pub user_id: UserId,
    pub event_id: EventId,
}

impl Registration {
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId) -> Self {
        Self { user_id, event_id }
    }
}

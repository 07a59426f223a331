//! Attendance ledger port — counter and membership changes as one unit.
//!
//! Adjusting the attendance counter and writing the membership row are two
//! writes against two tables. Implementations must commit both or neither:
//! a failure after the counter moved rolls the counter back.

use std::future::Future;
use std::sync::Arc;

use eventhub_domain::error::EventHubError;
use eventhub_domain::registration::Registration;

/// Transactional pairing of the attendance counter with membership rows.
pub trait AttendanceLedger {
    /// Take one seat and record the membership.
    ///
    /// The seat is taken with a conditional increment, so two concurrent
    /// admissions for the last seat cannot both succeed.
    ///
    /// # Errors
    ///
    /// - `MaxRegistered` when the event is full
    /// - `NotFound` when the event does not exist
    /// - `AlreadyRegistered` when the membership row already exists
    fn admit(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Release one seat and remove the membership.
    ///
    /// # Errors
    ///
    /// - `NotFound` for the event when it does not exist
    /// - `NotFound` for the registration when the row vanished concurrently
    fn release(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;
}

impl<T: AttendanceLedger + Send + Sync> AttendanceLedger for Arc<T> {
    fn admit(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).admit(registration)
    }

    fn release(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        (**self).release(registration)
    }
}

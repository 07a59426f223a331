//! Shared application state for axum handlers.

use std::sync::Arc;

use eventhub_app::ports::{AttendanceLedger, EventCache, EventRepository, RegistrationRepository};
use eventhub_app::services::event_service::EventService;
use eventhub_app::services::registration_service::RegistrationService;

/// Application state shared across all axum handlers.
///
/// Generic over the event repository, registration repository, attendance
/// ledger and cache to avoid dynamic dispatch. `Clone` is implemented
/// manually so the underlying types themselves do not need to be `Clone`.
pub struct AppState<ER, RR, L, C> {
    /// Event lifecycle service.
    pub event_service: Arc<EventService<ER, C>>,
    /// Registration service.
    pub registration_service: Arc<RegistrationService<RR, L, C>>,
}

impl<ER, RR, L, C> Clone for AppState<ER, RR, L, C> {
    fn clone(&self) -> Self {
        Self {
            event_service: Arc::clone(&self.event_service),
            registration_service: Arc::clone(&self.registration_service),
        }
    }
}

impl<ER, RR, L, C> AppState<ER, RR, L, C>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        event_service: EventService<ER, C>,
        registration_service: RegistrationService<RR, L, C>,
    ) -> Self {
        Self::from_arcs(Arc::new(event_service), Arc::new(registration_service))
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    pub fn from_arcs(
        event_service: Arc<EventService<ER, C>>,
        registration_service: Arc<RegistrationService<RR, L, C>>,
    ) -> Self {
        Self {
            event_service,
            registration_service,
        }
    }
}

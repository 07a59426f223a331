//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod registrations;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use std::str::FromStr;

use axum::Router;
use axum::routing::{delete, get};

use eventhub_app::ports::{AttendanceLedger, EventCache, EventRepository, RegistrationRepository};
use eventhub_domain::error::{EventHubError, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Parse a path, query or body value, reporting failures as
/// validation errors.
pub(crate) fn parse_param<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = ValidationError>,
{
    T::from_str(raw).map_err(|err| ApiError::from(EventHubError::from(err)))
}

/// Build the `/api` sub-router.
pub fn routes<ER, RR, L, C>() -> Router<AppState<ER, RR, L, C>>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    Router::new()
        // Events
        .route(
            "/events",
            get(events::list::<ER, RR, L, C>).post(events::create::<ER, RR, L, C>),
        )
        .route(
            "/events/{id}",
            get(events::get::<ER, RR, L, C>)
                .put(events::update::<ER, RR, L, C>)
                .delete(events::delete::<ER, RR, L, C>),
        )
        // Registrations
        .route(
            "/events/{id}/registrations",
            get(registrations::list::<ER, RR, L, C>)
                .post(registrations::register::<ER, RR, L, C>),
        )
        .route(
            "/events/{id}/registrations/{user_id}",
            delete(registrations::cancel::<ER, RR, L, C>),
        )
        // Users
        .route("/users/{user_id}/events", get(users::events::<ER, RR, L, C>))
}

//! JSON REST handlers scoped to a user.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use eventhub_app::ports::{AttendanceLedger, EventCache, EventRepository, RegistrationRepository};
use eventhub_domain::event::Event;
use eventhub_domain::id::UserId;

use super::parse_param;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the user events endpoint.
pub enum EventsResponse {
    Ok(Json<Vec<Event>>),
}

impl IntoResponse for EventsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/users/{user_id}/events`
pub async fn events<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path(user_id): Path<String>,
) -> Result<EventsResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let user_id = parse_param::<UserId>(&user_id)?;
    let events = state
        .registration_service
        .list_events_for_user(user_id)
        .await?;
    Ok(EventsResponse::Ok(Json(events)))
}

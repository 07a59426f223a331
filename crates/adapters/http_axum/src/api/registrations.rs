//! JSON REST handlers for event registrations.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use eventhub_app::ports::{AttendanceLedger, EventCache, EventRepository, RegistrationRepository};
use eventhub_domain::id::{EventId, UserId};

use super::parse_param;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<UserId>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created,
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created => StatusCode::CREATED.into_response(),
        }
    }
}

/// Possible responses from the cancel endpoint.
pub enum CancelResponse {
    NoContent,
}

impl IntoResponse for CancelResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/events/{id}/registrations`
pub async fn list<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path(id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let event_id = parse_param::<EventId>(&id)?;
    let users = state
        .registration_service
        .list_users_for_event(event_id)
        .await?;
    Ok(ListResponse::Ok(Json(users)))
}

/// `POST /api/events/{id}/registrations`
pub async fn register<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path(id): Path<String>,
    Json(req): Json<RegisterRequest>,
) -> Result<RegisterResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let event_id = parse_param::<EventId>(&id)?;
    let user_id = parse_param::<UserId>(&req.user_id)?;
    state
        .registration_service
        .register(user_id, event_id)
        .await?;
    Ok(RegisterResponse::Created)
}

/// `DELETE /api/events/{id}/registrations/{user_id}`
pub async fn cancel<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<CancelResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let event_id = parse_param::<EventId>(&id)?;
    let user_id = parse_param::<UserId>(&user_id)?;
    state
        .registration_service
        .cancel_registration(user_id, event_id)
        .await?;
    Ok(CancelResponse::NoContent)
}

//! JSON REST handlers for events.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use eventhub_app::ports::{AttendanceLedger, EventCache, EventRepository, RegistrationRepository};
use eventhub_domain::error::{EventHubError, ValidationError};
use eventhub_domain::event::{Event, EventFilter, EventStatus, EventUpdate, NewEvent, Timestamp};
use eventhub_domain::id::{EventId, UserId};

use super::parse_param;
use crate::error::ApiError;
use crate::state::AppState;

/// Query string accepted by the list endpoint. At most one filter applies.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub creator: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<EventFilter, ApiError> {
        match (self.creator, self.status) {
            (None, None) => Ok(EventFilter::All),
            (Some(creator), None) => Ok(EventFilter::Creator(parse_param::<UserId>(&creator)?)),
            (None, Some(status)) => Ok(EventFilter::Status(parse_param::<EventStatus>(&status)?)),
            (Some(_), Some(_)) => Err(EventHubError::from(ValidationError::ConflictingFilters).into()),
        }
    }
}

/// Request body for creating an event.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub max_attendees: Option<u32>,
    pub creator: Option<String>,
}

impl CreateEventRequest {
    fn into_new_event(self) -> Result<NewEvent, ApiError> {
        let mut builder = NewEvent::builder()
            .title(self.title.unwrap_or_default())
            .description(self.description.unwrap_or_default())
            .location(self.location.unwrap_or_default())
            .max_attendees(self.max_attendees.unwrap_or_default());
        if let Some(starts_at) = self.starts_at {
            builder = builder.starts_at(starts_at);
        }
        if let Some(status) = self.status {
            builder = builder.status(parse_param::<EventStatus>(&status)?);
        }
        if let Some(creator) = self.creator {
            builder = builder.creator(parse_param::<UserId>(&creator)?);
        }
        Ok(builder.build()?)
    }
}

/// Request body for overwriting an event.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: String,
    pub description: String,
    pub starts_at: Timestamp,
    pub location: String,
    pub status: String,
    pub max_attendees: u32,
}

/// Body returned once an event has been created.
#[derive(Debug, Serialize)]
pub struct CreatedEvent {
    pub id: EventId,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Event>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Event>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedEvent>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update and delete endpoints.
pub enum NoContentResponse {
    NoContent,
}

impl IntoResponse for NoContentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/events`
pub async fn list<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let filter = query.into_filter()?;
    let events = state.event_service.list_events(filter).await?;
    Ok(ListResponse::Ok(Json(events)))
}

/// `GET /api/events/{id}`
pub async fn get<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let event_id = parse_param::<EventId>(&id)?;
    let event = state.event_service.get_event(event_id).await?;
    Ok(GetResponse::Ok(Json(event)))
}

/// `POST /api/events`
pub async fn create<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Json(req): Json<CreateEventRequest>,
) -> Result<CreateResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let event = req.into_new_event()?;
    let id = state.event_service.create_event(event).await?;
    Ok(CreateResponse::Created(Json(CreatedEvent { id })))
}

/// `PUT /api/events/{id}`
pub async fn update<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<NoContentResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let update = EventUpdate {
        id: parse_param::<EventId>(&id)?,
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        location: req.location,
        status: parse_param::<EventStatus>(&req.status)?,
        max_attendees: req.max_attendees,
    };
    state.event_service.update_event(update).await?;
    Ok(NoContentResponse::NoContent)
}

/// `DELETE /api/events/{id}`
pub async fn delete<ER, RR, L, C>(
    State(state): State<AppState<ER, RR, L, C>>,
    Path(id): Path<String>,
) -> Result<NoContentResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    L: AttendanceLedger + Send + Sync + 'static,
    C: EventCache + Send + Sync + 'static,
{
    let event_id = parse_param::<EventId>(&id)?;
    state.event_service.delete_event(event_id).await?;
    Ok(NoContentResponse::NoContent)
}

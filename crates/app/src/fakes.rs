//! In-memory port implementations shared by the service tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::TimeZone;
use tokio::time::Instant;

use eventhub_domain::error::{
    EventHubError, NotFoundError, RegistrationError, ValidationError,
};
use eventhub_domain::event::{Event, EventStatus, EventUpdate, NewEvent};
use eventhub_domain::id::{EventId, UserId};
use eventhub_domain::registration::Registration;

use crate::ports::{AttendanceLedger, EventCache, EventRepository, RegistrationRepository};

pub(crate) fn sample_event(id: i64) -> Event {
    new_event("Sample event", 10).into_event(EventId::new(id))
}

pub(crate) fn new_event(title: &str, max_attendees: u32) -> NewEvent {
    NewEvent::builder()
        .title(title)
        .description("An event used in tests")
        .starts_at(chrono::Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap())
        .location("Room 101")
        .status(EventStatus::Published)
        .max_attendees(max_attendees)
        .creator(UserId::new())
        .build()
        .unwrap()
}

#[derive(Default)]
struct State {
    next_id: i64,
    events: BTreeMap<EventId, Event>,
    registrations: HashSet<Registration>,
}

/// Event store, registration store and ledger over one locked state, so
/// ledger operations are atomic like a storage transaction.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Mutex<State>,
    get_by_id_calls: AtomicUsize,
}

impl InMemoryStore {
    pub(crate) fn get_by_id_calls(&self) -> usize {
        self.get_by_id_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn attendance(&self, id: EventId) -> u32 {
        let state = self.state.lock().unwrap();
        state.events[&id].current_attendance
    }

    pub(crate) fn registration_count(&self, id: EventId) -> usize {
        let state = self.state.lock().unwrap();
        state
            .registrations
            .iter()
            .filter(|reg| reg.event_id == id)
            .count()
    }

    fn sorted(mut events: Vec<Event>) -> Vec<Event> {
        events.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        events
    }
}

fn check_seat(state: &State, id: EventId) -> Result<(), EventHubError> {
    let event = state
        .events
        .get(&id)
        .ok_or_else(|| NotFoundError::event(id))?;
    if event.current_attendance >= event.max_attendees {
        return Err(RegistrationError::MaxRegistered { event_id: id }.into());
    }
    Ok(())
}

impl EventRepository for InMemoryStore {
    fn create(
        &self,
        event: NewEvent,
    ) -> impl Future<Output = Result<EventId, EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = EventId::new(state.next_id);
        state.events.insert(id, event.into_event(id));
        async move { Ok(id) }
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        let result = state.events.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let state = self.state.lock().unwrap();
        let result = Self::sorted(state.events.values().cloned().collect());
        async { Ok(result) }
    }

    fn get_all_by_creator(
        &self,
        creator: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let state = self.state.lock().unwrap();
        let result = Self::sorted(
            state
                .events
                .values()
                .filter(|event| event.creator == creator)
                .cloned()
                .collect(),
        );
        async { Ok(result) }
    }

    fn get_all_by_status(
        &self,
        status: EventStatus,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let state = self.state.lock().unwrap();
        let result = Self::sorted(
            state
                .events
                .values()
                .filter(|event| event.status == status)
                .cloned()
                .collect(),
        );
        async { Ok(result) }
    }

    fn update(
        &self,
        update: EventUpdate,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.events.get_mut(&update.id) {
            None => Err(NotFoundError::event(update.id).into()),
            Some(event) if update.max_attendees < event.current_attendance => {
                Err(ValidationError::CapacityBelowAttendance {
                    requested: update.max_attendees,
                    current: event.current_attendance,
                }
                .into())
            }
            Some(event) => {
                event.title = update.title;
                event.description = update.description;
                event.starts_at = update.starts_at;
                event.location = update.location;
                event.status = update.status;
                event.max_attendees = update.max_attendees;
                Ok(())
            }
        };
        async { result }
    }

    fn delete_by_id(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if state.events.remove(&id).is_some() {
            state.registrations.retain(|reg| reg.event_id != id);
            Ok(())
        } else {
            Err(NotFoundError::event(id).into())
        };
        async { result }
    }

    fn increment_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = check_seat(&state, id).map(|()| {
            if let Some(event) = state.events.get_mut(&id) {
                event.current_attendance += 1;
            }
        });
        async { result }
    }

    fn decrement_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.events.get_mut(&id) {
            Some(event) => {
                event.current_attendance = event.current_attendance.saturating_sub(1);
                Ok(())
            }
            None => Err(NotFoundError::event(id).into()),
        };
        async { result }
    }
}

impl RegistrationRepository for InMemoryStore {
    fn exists(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.registrations.contains(&registration);
        async move { Ok(result) }
    }

    fn create(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if !state.events.contains_key(&registration.event_id) {
            Err(NotFoundError::event(registration.event_id).into())
        } else if state.registrations.insert(registration) {
            Ok(())
        } else {
            Err(RegistrationError::AlreadyRegistered {
                user_id: registration.user_id,
                event_id: registration.event_id,
            }
            .into())
        };
        async { result }
    }

    fn delete(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if state.registrations.remove(&registration) {
            Ok(())
        } else {
            Err(NotFoundError::registration(registration.user_id, registration.event_id).into())
        };
        async { result }
    }

    fn list_users_by_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<UserId>, EventHubError>> + Send {
        let state = self.state.lock().unwrap();
        let mut result: Vec<UserId> = state
            .registrations
            .iter()
            .filter(|reg| reg.event_id == event_id)
            .map(|reg| reg.user_id)
            .collect();
        result.sort();
        async { Ok(result) }
    }

    fn list_events_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let state = self.state.lock().unwrap();
        let result = Self::sorted(
            state
                .registrations
                .iter()
                .filter(|reg| reg.user_id == user_id)
                .filter_map(|reg| state.events.get(&reg.event_id).cloned())
                .collect(),
        );
        async { Ok(result) }
    }
}

impl AttendanceLedger for InMemoryStore {
    fn admit(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = check_seat(&state, registration.event_id).and_then(|()| {
            if state.registrations.insert(registration) {
                if let Some(event) = state.events.get_mut(&registration.event_id) {
                    event.current_attendance += 1;
                }
                Ok(())
            } else {
                Err(RegistrationError::AlreadyRegistered {
                    user_id: registration.user_id,
                    event_id: registration.event_id,
                }
                .into())
            }
        });
        async { result }
    }

    fn release(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if !state.events.contains_key(&registration.event_id) {
            Err(NotFoundError::event(registration.event_id).into())
        } else if state.registrations.remove(&registration) {
            if let Some(event) = state.events.get_mut(&registration.event_id) {
                event.current_attendance = event.current_attendance.saturating_sub(1);
            }
            Ok(())
        } else {
            Err(NotFoundError::registration(registration.user_id, registration.event_id).into())
        };
        async { result }
    }
}

/// TTL-aware cache on tokio's clock, so tests can pause and advance time.
#[derive(Default)]
pub(crate) struct InMemoryCache {
    entries: Mutex<HashMap<EventId, (Event, Instant)>>,
    deletes: AtomicUsize,
}

impl InMemoryCache {
    pub(crate) fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

impl EventCache for InMemoryCache {
    fn get(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        let entries = self.entries.lock().unwrap();
        let result = entries
            .get(&id)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(event, _)| event.clone());
        async { Ok(result) }
    }

    fn set(
        &self,
        event: &Event,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(event.id, (event.clone(), Instant::now() + ttl));
        async { Ok(()) }
    }

    fn delete(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&id);
        async { Ok(()) }
    }

    fn exists(&self, id: EventId) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        let entries = self.entries.lock().unwrap();
        let result = entries
            .get(&id)
            .is_some_and(|(_, expires_at)| Instant::now() < *expires_at);
        async move { Ok(result) }
    }
}

/// Cache whose every call fails, as if the cache server were unreachable.
pub(crate) struct FailingCache;

fn offline() -> EventHubError {
    EventHubError::Cache("cache offline".into())
}

impl EventCache for FailingCache {
    async fn get(&self, _id: EventId) -> Result<Option<Event>, EventHubError> {
        Err(offline())
    }

    async fn set(&self, _event: &Event, _ttl: Duration) -> Result<(), EventHubError> {
        Err(offline())
    }

    async fn delete(&self, _id: EventId) -> Result<(), EventHubError> {
        Err(offline())
    }

    async fn exists(&self, _id: EventId) -> Result<bool, EventHubError> {
        Err(offline())
    }
}

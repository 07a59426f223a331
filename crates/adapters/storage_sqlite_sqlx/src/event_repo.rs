//! `SQLite` implementation of [`EventRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};
use uuid::fmt::Hyphenated;

use eventhub_app::ports::EventRepository;
use eventhub_domain::error::{EventHubError, NotFoundError, RegistrationError, ValidationError};
use eventhub_domain::event::{Event, EventStatus, EventUpdate, NewEvent};
use eventhub_domain::id::{EventId, UserId};

use crate::error::{StorageError, decode_error};

/// Wrapper for converting database rows into domain [`Event`].
pub(crate) struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }

    pub(crate) fn unwrap_all(rows: Vec<Self>) -> Vec<Event> {
        rows.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let starts_at: String = row.try_get("starts_at")?;
        let status: String = row.try_get("status")?;
        let max_attendees: i64 = row.try_get("max_attendees")?;
        let current_attendance: i64 = row.try_get("current_attendance")?;
        let creator: Hyphenated = row.try_get("creator")?;

        let starts_at = DateTime::parse_from_rfc3339(&starts_at)
            .map_err(decode_error)?
            .with_timezone(&Utc);
        let status = EventStatus::from_str(&status).map_err(decode_error)?;
        let max_attendees = u32::try_from(max_attendees).map_err(decode_error)?;
        let current_attendance = u32::try_from(current_attendance).map_err(decode_error)?;

        Ok(Self(Event {
            id: EventId::new(id),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            starts_at,
            location: row.try_get("location")?,
            status,
            max_attendees,
            current_attendance,
            creator: UserId::from_uuid(creator.into_uuid()),
        }))
    }
}

const INSERT: &str = "INSERT INTO events (title, description, starts_at, location, status, max_attendees, current_attendance, creator) VALUES (?, ?, ?, ?, ?, ?, 0, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM events WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM events ORDER BY title, id";
const SELECT_BY_CREATOR: &str = "SELECT * FROM events WHERE creator = ? ORDER BY title, id";
const SELECT_BY_STATUS: &str = "SELECT * FROM events WHERE status = ? ORDER BY title, id";
const SELECT_ATTENDANCE: &str = "SELECT current_attendance FROM events WHERE id = ?";
const EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM events WHERE id = ?)";
// The capacity guard lives in the WHERE clause so it is checked against the
// attendance at write time.
const UPDATE: &str = "UPDATE events SET title = ?, description = ?, starts_at = ?, location = ?, status = ?, max_attendees = ? WHERE id = ? AND current_attendance <= ?";
const DELETE_BY_ID: &str = "DELETE FROM events WHERE id = ?";
const INCREMENT_ATTENDANCE: &str = "UPDATE events SET current_attendance = current_attendance + 1 WHERE id = ? AND current_attendance < max_attendees";
const DECREMENT_ATTENDANCE: &str = "UPDATE events SET current_attendance = current_attendance - 1 WHERE id = ? AND current_attendance > 0";

async fn event_exists(conn: &mut SqliteConnection, id: EventId) -> Result<bool, StorageError> {
    let exists: bool = sqlx::query_scalar(EXISTS)
        .bind(id.as_i64())
        .fetch_one(conn)
        .await?;
    Ok(exists)
}

/// Take one seat of `id` on `conn`, which may be inside a transaction.
pub(crate) async fn take_seat(
    conn: &mut SqliteConnection,
    id: EventId,
) -> Result<(), EventHubError> {
    let result = sqlx::query(INCREMENT_ATTENDANCE)
        .bind(id.as_i64())
        .execute(&mut *conn)
        .await
        .map_err(StorageError::from)?;
    if result.rows_affected() == 1 {
        return Ok(());
    }
    if event_exists(conn, id).await? {
        Err(RegistrationError::MaxRegistered { event_id: id }.into())
    } else {
        Err(NotFoundError::event(id).into())
    }
}

/// Release one seat of `id` on `conn`; a counter already at zero stays there.
pub(crate) async fn release_seat(
    conn: &mut SqliteConnection,
    id: EventId,
) -> Result<(), EventHubError> {
    let result = sqlx::query(DECREMENT_ATTENDANCE)
        .bind(id.as_i64())
        .execute(&mut *conn)
        .await
        .map_err(StorageError::from)?;
    if result.rows_affected() == 1 || event_exists(conn, id).await? {
        Ok(())
    } else {
        Err(NotFoundError::event(id).into())
    }
}

/// `SQLite`-backed event repository.
pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn fetch_list(
        &self,
        query: &'static str,
        param: String,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(query)
                .bind(param)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::unwrap_all(rows))
        }
    }
}

impl EventRepository for SqliteEventRepository {
    fn create(
        &self,
        event: NewEvent,
    ) -> impl Future<Output = Result<EventId, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&event.title)
                .bind(&event.description)
                .bind(event.starts_at.to_rfc3339())
                .bind(event.location.as_str())
                .bind(event.status.as_str())
                .bind(i64::from(event.max_attendees))
                .bind(event.creator.as_uuid().hyphenated())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(EventId::new(result.last_insert_rowid()))
        }
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::unwrap_all(rows))
        }
    }

    fn get_all_by_creator(
        &self,
        creator: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        self.fetch_list(
            SELECT_BY_CREATOR,
            creator.as_uuid().hyphenated().to_string(),
        )
    }

    fn get_all_by_status(
        &self,
        status: EventStatus,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        self.fetch_list(SELECT_BY_STATUS, status.as_str().to_string())
    }

    fn update(
        &self,
        update: EventUpdate,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&update.title)
                .bind(&update.description)
                .bind(update.starts_at.to_rfc3339())
                .bind(update.location.as_str())
                .bind(update.status.as_str())
                .bind(i64::from(update.max_attendees))
                .bind(update.id.as_i64())
                .bind(i64::from(update.max_attendees))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            if result.rows_affected() == 1 {
                return Ok(());
            }

            let current: Option<i64> = sqlx::query_scalar(SELECT_ATTENDANCE)
                .bind(update.id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(current) = current else {
                return Err(NotFoundError::event(update.id).into());
            };
            let current =
                u32::try_from(current).map_err(|err| StorageError::from(decode_error(err)))?;
            Err(ValidationError::CapacityBelowAttendance {
                requested: update.max_attendees,
                current,
            }
            .into())
        }
    }

    fn delete_by_id(&self, id: EventId) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError::event(id).into());
            }
            Ok(())
        }
    }

    fn increment_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            take_seat(&mut conn, id).await
        }
    }

    fn decrement_attendance(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            release_seat(&mut conn, id).await
        }
    }
}

//! `SQLite` implementation of [`RegistrationRepository`].

use std::future::Future;

use sqlx::{SqliteConnection, SqlitePool};
use uuid::fmt::Hyphenated;

use eventhub_app::ports::RegistrationRepository;
use eventhub_domain::error::{EventHubError, NotFoundError, RegistrationError};
use eventhub_domain::event::Event;
use eventhub_domain::id::{EventId, UserId};
use eventhub_domain::registration::Registration;

use crate::error::StorageError;
use crate::event_repo::Wrapper;

const INSERT: &str = "INSERT INTO registrations (user_id, event_id) VALUES (?, ?)";
const EXISTS: &str =
    "SELECT EXISTS (SELECT 1 FROM registrations WHERE user_id = ? AND event_id = ?)";
const DELETE: &str = "DELETE FROM registrations WHERE user_id = ? AND event_id = ?";
const SELECT_USERS_BY_EVENT: &str =
    "SELECT user_id FROM registrations WHERE event_id = ? ORDER BY rowid";
const SELECT_EVENTS_BY_USER: &str = "SELECT events.* FROM events INNER JOIN registrations ON registrations.event_id = events.id WHERE registrations.user_id = ? ORDER BY events.title, events.id";

/// Translate constraint violations on the membership insert into domain errors.
fn insert_error(err: sqlx::Error, registration: Registration) -> EventHubError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RegistrationError::AlreadyRegistered {
                user_id: registration.user_id,
                event_id: registration.event_id,
            }
            .into();
        }
        if db_err.is_foreign_key_violation() {
            return NotFoundError::event(registration.event_id).into();
        }
    }
    StorageError::from(err).into()
}

/// Insert the membership row on `conn`, which may be inside a transaction.
pub(crate) async fn insert_membership(
    conn: &mut SqliteConnection,
    registration: Registration,
) -> Result<(), EventHubError> {
    sqlx::query(INSERT)
        .bind(registration.user_id.as_uuid().hyphenated())
        .bind(registration.event_id.as_i64())
        .execute(conn)
        .await
        .map_err(|err| insert_error(err, registration))?;
    Ok(())
}

/// Delete the membership row on `conn`; a missing row is `NotFound`.
pub(crate) async fn delete_membership(
    conn: &mut SqliteConnection,
    registration: Registration,
) -> Result<(), EventHubError> {
    let result = sqlx::query(DELETE)
        .bind(registration.user_id.as_uuid().hyphenated())
        .bind(registration.event_id.as_i64())
        .execute(conn)
        .await
        .map_err(StorageError::from)?;

    if result.rows_affected() == 0 {
        return Err(
            NotFoundError::registration(registration.user_id, registration.event_id).into(),
        );
    }
    Ok(())
}

/// `SQLite`-backed registration repository.
pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RegistrationRepository for SqliteRegistrationRepository {
    fn exists(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let exists: bool = sqlx::query_scalar(EXISTS)
                .bind(registration.user_id.as_uuid().hyphenated())
                .bind(registration.event_id.as_i64())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn create(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            insert_membership(&mut conn, registration).await
        }
    }

    fn delete(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            delete_membership(&mut conn, registration).await
        }
    }

    fn list_users_by_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<UserId>, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Hyphenated> = sqlx::query_scalar(SELECT_USERS_BY_EVENT)
                .bind(event_id.as_i64())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows
                .into_iter()
                .map(|uuid| UserId::from_uuid(uuid.into_uuid()))
                .collect())
        }
    }

    fn list_events_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_EVENTS_BY_USER)
                .bind(user_id.as_uuid().hyphenated())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::unwrap_all(rows))
        }
    }
}

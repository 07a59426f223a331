//! `SQLite` implementation of [`AttendanceLedger`].
//!
//! The counter update and the membership write run in one transaction. The
//! counter statement comes first so the transaction takes the write lock
//! immediately instead of upgrading from a read lock.

use std::future::Future;

use sqlx::{Sqlite, SqlitePool, Transaction};

use eventhub_app::ports::AttendanceLedger;
use eventhub_domain::error::EventHubError;
use eventhub_domain::registration::Registration;

use crate::error::StorageError;
use crate::event_repo::{release_seat, take_seat};
use crate::registration_repo::{delete_membership, insert_membership};

/// Commit on success, otherwise roll back and return the original error.
///
/// A failed rollback is only logged: the connection discards the open
/// transaction when it goes back to the pool.
async fn finish(
    tx: Transaction<'static, Sqlite>,
    outcome: Result<(), EventHubError>,
) -> Result<(), EventHubError> {
    match outcome {
        Ok(()) => {
            tx.commit().await.map_err(StorageError::from)?;
            Ok(())
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(%rollback_err, %err, "attendance rollback failed");
            }
            Err(err)
        }
    }
}

/// `SQLite`-backed attendance ledger.
pub struct SqliteAttendanceLedger {
    pool: SqlitePool,
}

impl SqliteAttendanceLedger {
    /// Create a new ledger using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AttendanceLedger for SqliteAttendanceLedger {
    fn admit(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let outcome = async {
                take_seat(&mut tx, registration.event_id).await?;
                insert_membership(&mut tx, registration).await
            }
            .await;

            finish(tx, outcome).await
        }
    }

    fn release(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            let outcome = async {
                release_seat(&mut tx, registration.event_id).await?;
                delete_membership(&mut tx, registration).await
            }
            .await;

            finish(tx, outcome).await
        }
    }
}

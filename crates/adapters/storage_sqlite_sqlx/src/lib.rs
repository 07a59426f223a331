//! # eventhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `EventRepository`, `RegistrationRepository` and
//!   `AttendanceLedger` ports defined in `eventhub-app`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows, and constraint violations
//!   to domain errors
//!
//! ## Dependency rule
//! Depends on `eventhub-app` (for port traits) and `eventhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod attendance;
mod error;
mod event_repo;
mod pool;
mod registration_repo;

pub use attendance::SqliteAttendanceLedger;
pub use error::StorageError;
pub use event_repo::SqliteEventRepository;
pub use pool::{Config, Database};
pub use registration_repo::SqliteRegistrationRepository;

//! # eventhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `EventRepository` — event CRUD plus atomic attendance adjustments
//!   - `RegistrationRepository` — user ↔ event membership rows
//!   - `AttendanceLedger` — counter + membership change in one transaction
//!   - `EventCache` — keyed, TTL-bounded snapshots of single events
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EventService` — create, update, delete, get (cache-aside), list
//!   - `RegistrationService` — register, cancel, list by user / by event
//! - Own the cache-aside policy (`CacheAside`) and per-call deadlines
//!
//! ## Dependency rule
//! Depends on `eventhub-domain` only (plus `tokio` for timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod cache_aside;
pub mod config;
pub mod deadline;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod fakes;

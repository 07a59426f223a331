//! # eventhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for events (`/api/events`), registrations
//!   (`/api/events/{id}/registrations`) and per-user listings
//!   (`/api/users/{user_id}/events`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and [`EventHubError`](eventhub_domain::error::EventHubError)
//!   outcomes into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `eventhub-app` (for port traits and services) and `eventhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

//! # eventhub-domain
//!
//! Pure domain model for the eventhub registration system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and the error taxonomy
//! - Define **Events** (schedulable occurrences with a bounded attendee capacity)
//! - Define **Registrations** (a user's membership in an event's attendee set)
//! - Contain all field validation and invariant checks
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod event;
pub mod registration;

//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Every port is also implemented for `Arc<T>`, so one adapter instance can
//! be handed to several services.

pub mod attendance;
pub mod cache;
pub mod event_repo;
pub mod registration_repo;

pub use attendance::AttendanceLedger;
pub use cache::EventCache;
pub use event_repo::EventRepository;
pub use registration_repo::RegistrationRepository;

//! Settings the application services need from the outside.

use std::time::Duration;

/// Runtime knobs shared by [`EventService`](crate::services::event_service::EventService)
/// and [`RegistrationService`](crate::services::registration_service::RegistrationService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Lifetime of a cached event snapshot. Also the upper bound on how long
    /// a snapshot can stay stale after a failed invalidation.
    pub cache_ttl: Duration,
    /// Deadline applied to every storage and cache call.
    pub call_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            call_timeout: Duration::from_secs(5),
        }
    }
}

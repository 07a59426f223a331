//! # eventhubd — eventhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Pick the cache backend (in-process or `Redis`)
//! - Construct application services, injecting adapters via port traits
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use eventhub_adapter_cache_memory::InMemoryEventCache;
use eventhub_adapter_cache_redis::RedisEventCache;
use eventhub_adapter_http_axum::state::AppState;
use eventhub_adapter_storage_sqlite_sqlx::{
    Database, SqliteAttendanceLedger, SqliteEventRepository, SqliteRegistrationRepository,
};
use eventhub_app::ports::EventCache;
use eventhub_app::services::event_service::EventService;
use eventhub_app::services::registration_service::RegistrationService;

use crate::config::{CacheBackend, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database
    let db = eventhub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
        max_connections: config.database.max_connections,
    }
    .build()
    .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        "database ready"
    );

    // Cache
    let result = match config.cache.backend {
        CacheBackend::Memory => {
            let cache = Arc::new(InMemoryEventCache::default());
            spawn_purger(Arc::clone(&cache), config.service_config().cache_ttl);
            tracing::info!(ttl_secs = config.cache.ttl_secs, "using in-process event cache");
            serve(&config, &db, cache).await
        }
        CacheBackend::Redis => {
            let cache = RedisEventCache::connect(&config.cache.redis_url).await?;
            tracing::info!(ttl_secs = config.cache.ttl_secs, "using redis event cache");
            serve(&config, &db, cache).await
        }
    };

    db.close().await;
    tracing::info!("eventhubd stopped");
    result
}

/// Wire services over `cache` and serve HTTP until a shutdown signal arrives.
async fn serve<C>(config: &Config, db: &Database, cache: C) -> Result<(), BoxError>
where
    C: EventCache + Clone + Send + Sync + 'static,
{
    let pool = db.pool().clone();
    let service_config = config.service_config();

    // Services
    let event_service = EventService::new(
        SqliteEventRepository::new(pool.clone()),
        cache.clone(),
        service_config,
    );
    let registration_service = RegistrationService::new(
        SqliteRegistrationRepository::new(pool.clone()),
        SqliteAttendanceLedger::new(pool),
        cache,
        service_config,
    );

    // HTTP
    let state = AppState::new(event_service, registration_service);
    let app = eventhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "eventhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Sweep expired snapshots out of the in-process cache once per TTL.
fn spawn_purger(cache: Arc<InMemoryEventCache>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = cache.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired cache entries removed");
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

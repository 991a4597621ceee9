use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use geozone_db::{MemoryStore, PgStateStore, StateStore};
use geozone_events::{forward_lines, InboxListener, MessageInbox};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geozone_api::config::ServerConfig;
use geozone_api::router::build_app_router;
use geozone_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "geozone_api=debug,geozone_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        at_home = %config.geofence.at_home,
        auth_enabled = !config.geofence.user.is_empty() || !config.geofence.pass.is_empty(),
        ignore_leaving = config.geofence.ignore_leaving,
        "Loaded server configuration"
    );

    // --- Store ---
    let store = connect_store().await;

    // --- Inbox ---
    let (inbox, inbox_rx) = MessageInbox::with_default_capacity();

    // --- App state ---
    let state = AppState::new(config.clone(), store);
    let processor = state.processor.clone();

    let listener_handle = tokio::spawn(InboxListener::run(processor.clone(), inbox_rx));

    let stdin_handle = config.geofence.stdin_inbox.then(|| {
        tracing::info!("Reading inbox messages from stdin");
        tokio::spawn(forward_lines(BufReader::new(tokio::io::stdin()), inbox.clone()))
    });
    drop(inbox);

    // --- Serve ---
    if config.geofence.activate_server {
        let addr = SocketAddr::new(
            config.host.parse().expect("Invalid HOST address"),
            config.port,
        );
        let app = build_app_router(state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind to address");
        tracing::info!(%addr, "HTTP server is listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .expect("Server error");

        tracing::info!("Server stopped accepting connections, cleaning up");
    } else {
        tracing::info!("HTTP server disabled, serving inbox only");
        shutdown_signal().await;
        drop(state);
    }

    // --- Post-shutdown cleanup ---
    if let Some(handle) = stdin_handle {
        handle.abort();
    }

    // All inbox senders are gone now, so the listener drains and exits.
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(grace, listener_handle).await;

    let pending = processor.in_flight();
    if tokio::time::timeout(grace, processor.wait_idle()).await.is_err() {
        tracing::warn!(pending, "Timed out waiting for in-flight events");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Pick the state store: PostgreSQL when `DATABASE_URL` is set, otherwise
/// an in-memory store.
async fn connect_store() -> Arc<dyn StateStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        tracing::warn!("DATABASE_URL not set, presence state is kept in memory only");
        return Arc::new(MemoryStore::new());
    };

    let pool = geozone_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    geozone_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    geozone_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(PgStateStore::new(pool))
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

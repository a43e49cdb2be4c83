use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rankqueue_api::background;
use rankqueue_api::config::{consensus_config_from_env, ServerConfig};
use rankqueue_api::router::build_app_router;
use rankqueue_api::state::AppState;
use rankqueue_engine::{ConsensusEngine, ProductionEffects};
use rankqueue_events::{Announcer, EventBus, EventPersistence};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rankqueue_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let consensus = consensus_config_from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        votes_required = consensus.votes_required,
        denials_required = consensus.denials_required,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = rankqueue_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    rankqueue_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    rankqueue_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // Spawn event persistence (writes all events to the database).
    let persistence_handle = tokio::spawn(EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    // Spawn the webhook announcer when a target is configured.
    let announcer_handle = match std::env::var("ANNOUNCE_WEBHOOK_URL") {
        Ok(url) if !url.is_empty() => {
            tracing::info!("Announcer started");
            Some(tokio::spawn(
                Announcer::new(url).run(event_bus.subscribe()),
            ))
        }
        _ => {
            tracing::info!("ANNOUNCE_WEBHOOK_URL not set, announcements disabled");
            None
        }
    };

    // --- Consensus engine ---
    let effects = Arc::new(ProductionEffects::new(pool.clone(), Arc::clone(&event_bus)));
    let engine = Arc::new(
        ConsensusEngine::new(pool.clone(), consensus, effects)
            .expect("Invalid consensus configuration"),
    );

    // --- Hold-timeout job ---
    let hold_cancel = tokio_util::sync::CancellationToken::new();
    let hold_handle = tokio::spawn(background::hold_timeout::run(
        Arc::clone(&engine),
        pool.clone(),
        config.system_actor_id,
        hold_cancel.clone(),
    ));

    // --- App state & router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    hold_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), hold_handle).await;
    tracing::info!("Hold-timeout job stopped");

    // Drop the event bus sender to close the broadcast channel. This signals
    // the persistence and announcer tasks to shut down.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;
    if let Some(handle) = announcer_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Event services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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

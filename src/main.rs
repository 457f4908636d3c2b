//! dealroom - real-time negotiation server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use dealroom::adapters::http::{build_router, AppState};
use dealroom::adapters::postgres;
use dealroom::adapters::{
    InMemorySessionStore, JwtSessionValidator, PostgresSessionStore, RoomManager,
};
use dealroom::application::NegotiationHandlers;
use dealroom::config::AppConfig;
use dealroom::ports::{NegotiationPublisher, SessionStore, SessionValidator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        port = config.server.port,
        "Starting dealroom"
    );

    let store: Arc<dyn SessionStore> = match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            if database.run_migrations {
                postgres::run_migrations(&pool).await?;
            }
            Arc::new(PostgresSessionStore::new(pool))
        }
        None => {
            tracing::warn!("No database configured, sessions are kept in memory");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let validator: Arc<dyn SessionValidator> =
        Arc::new(JwtSessionValidator::from_config(&config.auth));
    let rooms = Arc::new(RoomManager::new(config.negotiation.outbound_buffer));
    let publisher: Arc<dyn NegotiationPublisher> = rooms.clone();
    let handlers = NegotiationHandlers::new(store, publisher, config.negotiation.policy());

    let app = build_router(
        AppState {
            handlers,
            rooms,
            validator,
        },
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

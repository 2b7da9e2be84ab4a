use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::school::repository::SeaOrmSchoolRepository;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn request_timeout(cfg: &ServerConfig) -> Option<Duration> {
    (cfg.request_timeout_secs > 0).then(|| Duration::from_secs(cfg.request_timeout_secs))
}

/// Connect storage, ensure the schema, serve until a shutdown signal, then release the pool.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    if cfg.database.is_in_memory() {
        warn!(event = "db_in_memory", "in-memory sqlite database; stored schools are lost when the pool recycles its connection");
    }
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("database connection failed")?;
    migration::Migrator::up(&db, None)
        .await
        .context("schema migration failed")?;
    info!(event = "schema_ready", "schools table ensured");

    let repo = Arc::new(SeaOrmSchoolRepository::new(db.clone()));
    let state = AppState::new(repo);
    let app: Router = routes::build_router(state, build_cors(), request_timeout(&cfg.server));

    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", cfg.server.bind_addr()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "starting school locator server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = db.close().await {
        warn!(error = %e, "closing database pool failed");
    }
    info!(event = "stop", "server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!(event = "shutdown_signal", signal = "ctrl_c", "shutting down"),
        () = terminate => info!(event = "shutdown_signal", signal = "sigterm", "shutting down"),
    }
}

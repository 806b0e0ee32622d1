mod config;
mod response;
mod routes;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub use config::{Config, StatusPolicy};
pub use response::{ApiError, Deleted, Envelope, ErrorBody};
pub use routes::{AppState, router};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    let conn = Database::connect(config.database_url.as_str())
        .await
        .context("Database connection failed")?;
    if config.run_migrations {
        Migrator::up(&conn, None)
            .await
            .context("Running migrations failed")?;
    }

    let conn = Arc::new(conn);
    let state = AppState {
        conn: Arc::clone(&conn),
        status: config.status_policy,
    };
    let app = router(state, &config.mount);

    let server_url = config.server_url();
    let listener = TcpListener::bind(&server_url)
        .await
        .with_context(|| format!("Cannot bind {server_url}"))?;
    info!(%server_url, mount = %config.mount, "facility server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and its state are dropped once serving returns.
    match Arc::try_unwrap(conn) {
        Ok(conn) => {
            info!("shutting down, closing database connection");
            conn.close()
                .await
                .context("Closing database connection failed")?;
        }
        Err(_) => warn!("database connection still shared at shutdown, not closing"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("cannot listen for Ctrl-C: {err}");
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
                error!("cannot listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub fn main() {
    let result = start();

    if let Some(err) = result.err() {
        error!("{err:#}");
        std::process::exit(1);
    }
}

//! Profiles service.
//!
//! # Startup
//! ```text
//! CLI/env → config file → validate → logging → metrics
//!     → database (pool + migrations) → listener → HttpServer::run
//! ```
//!
//! # Shutdown
//! First SIGTERM/SIGINT cancels the run context and in-flight requests are
//! allowed to finish. A second signal, or the grace deadline, force-closes
//! the server. The database pool is closed last.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use profiles::config::{load_config, validate_config, Config, ConfigError};
use profiles::database::Database;
use profiles::http::HttpServer;
use profiles::lifecycle::signals::termination_signal;
use profiles::net::Listener;
use profiles::observability::{logging, metrics};
use profiles::users;

#[derive(Parser)]
#[command(name = "profiles")]
#[command(about = "Read-only HTTP API over user profiles", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "PROFILES_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address.
    #[arg(long, env = "PROFILES_ADDRESS")]
    address: Option<String>,

    /// Override the database URL.
    #[arg(long, env = "PROFILES_DATABASE_URL")]
    database_url: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        if let Some(address) = self.address {
            config.server.address = address;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        address = %config.server.address,
        max_connections = config.server.max_connections,
        shutdown_grace_secs = config.server.shutdown_grace_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let db = Database::connect(&config.database).await?;
    let users = Arc::new(users::Service::new(db.users()));

    let listener = Listener::bind(&config.server).await?;
    let server = Arc::new(HttpServer::new(listener, users)?);

    let ctx = CancellationToken::new();
    let mut running = tokio::spawn({
        let server = Arc::clone(&server);
        let ctx = ctx.clone();
        async move { server.run(ctx).await }
    });

    tracing::info!(address = %server.local_addr(), "app started");

    let early = tokio::select! {
        result = &mut running => Ok(Some(result)),
        signal = termination_signal() => signal.map(|()| None),
    };

    let result = match early {
        Ok(Some(result)) => result,
        Err(e) => {
            tracing::error!(error = %e, "failed to install signal handler, closing server");
            server.close();
            if let Ok(Err(run_err)) = running.await {
                tracing::error!(error = %run_err, "error occurred while running http server");
            }
            db.close().await;
            return Err(e.into());
        }
        Ok(None) => {
            tracing::info!("app shutting down");
            ctx.cancel();

            let grace = Duration::from_secs(config.server.shutdown_grace_secs);
            tokio::select! {
                result = &mut running => result,
                _ = force_close_trigger(grace) => {
                    server.close();
                    running.await
                }
            }
        }
    };

    db.close().await;

    if let Err(e) = result? {
        tracing::error!(error = %e, "error occurred while running http server");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on a second termination signal or when the grace period ends.
async fn force_close_trigger(grace: Duration) {
    let second_signal = async {
        if termination_signal().await.is_err() {
            // No signal handler: only the deadline can force the close.
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = second_signal => {
            tracing::warn!("Second signal received, closing connections");
        }
        _ = tokio::time::sleep(grace) => {
            tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, closing connections");
        }
    }
}

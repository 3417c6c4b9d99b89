//! MySQL storage.
//!
//! # Responsibilities
//! - Create the connection pool
//! - Apply schema migrations at startup
//! - Hand out repositories bound to the pool
//!
//! Every failure here happens at startup and is fatal.

pub mod users;

use std::path::Path;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use users::MySqlUsers;

/// Errors raised while setting up the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("could not connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("could not apply migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Handle to the profiles database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Connect to the database and bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(DatabaseError::Connect)?;

        tracing::info!(max_connections = config.max_connections, "Database pool ready");

        if let Some(path) = &config.migrations_path {
            let migrator = Migrator::new(Path::new(path)).await?;
            migrator.run(&pool).await?;
            tracing::info!(path = %path, "Migrations applied");
        }

        Ok(Self { pool })
    }

    /// Users repository backed by this database.
    pub fn users(&self) -> MySqlUsers {
        MySqlUsers::new(self.pool.clone())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

//! Database layer
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Connection management and startup schema application

pub mod models;
mod repository;

pub use repository::{
    CatalogPatch, ImportMode, NewCatalog, OrderDraft, OrderPatch, Repository,
};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;

/// Connect to Postgres with the configured pool settings.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(&config.url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(true);

    Database::connect(opts)
        .await
        .map_err(|e| AppError::DatabaseConnection(format!("Failed to connect: {}", e)))
}

/// Apply the embedded schema at startup.
///
/// Every statement is idempotent (`CREATE ... IF NOT EXISTS`), executed one
/// at a time so a failure points at the offending statement.
pub async fn apply_schema(db: &DatabaseConnection) -> Result<()> {
    const SCHEMA: &str = include_str!("../../migrations/schema.sql");

    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        db.execute_unprepared(statement).await?;
    }

    Ok(())
}

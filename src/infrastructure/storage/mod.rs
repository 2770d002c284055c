//! Storage infrastructure
//!
//! Pool construction and schema migrations. The connection string lives in
//! `AppConfig.database` and is read exactly once, here.

mod migrations;

pub use migrations::{schema_migrations, Migration, PostgresMigrator};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Connect to PostgreSQL using the configured URL and pool size
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

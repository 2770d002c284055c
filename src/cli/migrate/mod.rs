//! Migrate command - applies pending schema migrations

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{self, PostgresMigrator};

/// Apply all pending migrations and exit
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;

    info!("Connecting to PostgreSQL");
    let pool = storage::connect(&config.database).await?;

    let migrator = PostgresMigrator::new(pool);
    migrator.run_all().await?;

    let version = migrator.current_version().await?;
    info!(?version, "Migrations applied");

    Ok(())
}

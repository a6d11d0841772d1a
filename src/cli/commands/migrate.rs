use anyhow::Context;

use crate::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let config = &config::config().database;
    let pool = DatabaseManager::connect_lazy(config).context("failed to configure database pool")?;

    DatabaseManager::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    println!("Migrations applied");
    pool.close().await;
    Ok(())
}

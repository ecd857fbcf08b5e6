#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<Result<(), String>> = OnceCell::const_new();

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let migrated = MIGRATED
        .get_or_init(|| async {
            let cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
            let db = connect_with_config(&cfg).await.map_err(|e| e.to_string())?;
            migration::Migrator::up(&db, None).await.map_err(|e| e.to_string())?;
            Ok(())
        })
        .await;
    if let Err(e) = migrated {
        anyhow::bail!("test database unavailable: {e}");
    }

    // Return a fresh connection for the current test's runtime
    let mut cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    let db = connect_with_config(&cfg).await?;
    Ok(db)
}

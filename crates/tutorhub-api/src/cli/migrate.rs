//! `tutorhub migrate`: bring the database schema up to date.

use std::path::Path;

use anyhow::Result;
use console::style;

use tutorhub_infra::sqlite::pool::DatabasePool;
use tutorhub_types::config::DatabaseConfig;

/// Open the database (which applies every pending migration) and close it.
pub async fn migrate(data_dir: &Path, config: &DatabaseConfig, json: bool) -> Result<()> {
    let pool = DatabasePool::open(data_dir, config).await?;
    pool.close().await;

    let path = data_dir.join(&config.filename);
    tracing::info!(database = %path.display(), "migrations applied");

    if json {
        let out = serde_json::json!({
            "database": path.display().to_string(),
            "migrated": true,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "  {} Database is up to date: {}",
            style("✓").green(),
            style(path.display()).dim()
        );
    }
    Ok(())
}

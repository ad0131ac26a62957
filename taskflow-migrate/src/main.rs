//! # TaskFlow Migration Tool
//!
//! Copies users and tasks from a legacy JSON document into the relational
//! store, preserving identities and skipping rows that already exist.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskflow-migrate -- --source db.json --database-url sqlite://task_manager.db
//! ```

use clap::Parser;
use std::path::PathBuf;
use taskflow_migrate::migrate;
use taskflow_shared::{
    db::pool::{DatabaseConfig, DEFAULT_DATABASE_URL},
    store::{json::DEFAULT_JSON_PATH, sql::SqlStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Import a legacy JSON document into the relational store
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Legacy JSON document to read
    #[arg(long, env = "LEGACY_JSON_PATH", default_value = DEFAULT_JSON_PATH)]
    source: PathBuf,

    /// Relational store to write into
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow_migrate=debug,taskflow_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    tracing::info!(
        source = %cli.source.display(),
        "TaskFlow Migration v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let store = SqlStore::connect(DatabaseConfig {
        url: cli.database_url,
        ..Default::default()
    })
    .await?;

    let report = migrate(&store, &cli.source).await?;
    store.close().await;

    println!("{}", report);
    Ok(())
}

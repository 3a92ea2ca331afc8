//! REST server entry point.

use anyhow::{Context, Result};
use clap::Parser;
use genaxis_api::{build_router, AppState};
use genaxis_core::db::open_db;
use genaxis_core::{init_logging, AppConfig};
use log::info;
use std::path::PathBuf;

/// Serves species, genes and CRISPR edits over JSON.
#[derive(Parser)]
#[command(name = "genaxis-api", version)]
struct Cli {
    /// listen address (defaults to GENAXIS_BIND or 127.0.0.1:8000)
    #[arg(long)]
    bind: Option<String>,

    /// SQLite database file (defaults to GENAXIS_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// write rolling log files here instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }

    init_logging(&config.log_level, config.log_dir.as_deref())
        .context("failed to initialize logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let router = build_router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(
        "event=api_start module=api status=ok bind={} db_path={}",
        config.bind_addr,
        config.db_path.display()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("event=api_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

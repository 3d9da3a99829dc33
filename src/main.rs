use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{info, Level};

use lending_reputation::{
    config::{AppConfig, LoggingConfig},
    replay, InMemoryStore, ReputationEngine, ReputationStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so logging honours it
    let mut config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {:#}", e);
        eprintln!("Please check LENDING_* environment variables.");
        e
    })?;

    if let Some(path) = std::env::args().nth(1) {
        config.replay.input = Some(PathBuf::from(path));
    }

    init_logging(&config.logging)?;

    info!("Starting lending reputation replay");

    let store = Arc::new(InMemoryStore::with_capacity(config.store.initial_capacity));
    let engine = ReputationEngine::new(store);

    let stats = match &config.replay.input {
        Some(path) => {
            info!(path = %path.display(), "Replaying events from file");
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open event file {}", path.display()))?;
            replay::replay(&engine, BufReader::new(file), config.replay.fail_fast).await?
        }
        None => {
            info!("Replaying events from stdin");
            replay::replay(&engine, BufReader::new(tokio::io::stdin()), config.replay.fail_fast).await?
        }
    };

    let leaderboard = engine.leaderboard(config.replay.leaderboard_limit).await;
    let mut output = serde_json::to_vec_pretty(&leaderboard).context("Failed to encode leaderboard")?;
    output.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await.context("Failed to write leaderboard")?;
    stdout.flush().await?;

    info!(
        users = engine.store().len(),
        applied = stats.applied,
        rejected = stats.rejected,
        "Replay complete"
    );

    Ok(())
}

/// Initialize logging to stderr; stdout carries the leaderboard
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let log_level = match config.level.as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))
}

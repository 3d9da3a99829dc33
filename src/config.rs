use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Configuration for the reputation replay tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Event replay configuration
    pub replay: ReplayConfig,
    /// Record store configuration
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// NDJSON event file; stdin when unset
    pub input: Option<PathBuf>,
    /// Abort on the first rejected event instead of skipping it
    pub fail_fast: bool,
    /// Number of users printed in the final leaderboard
    pub leaderboard_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Records preallocated in the in-memory store
    pub initial_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: None,
            fail_fast: false,
            leaderboard_limit: 100,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Logging configuration
        if let Some(level) = var("LENDING_LOG_LEVEL") {
            config.logging.level = level.to_lowercase();
        }

        if let Some(json) = var("LENDING_LOG_JSON") {
            config.logging.json = json.parse().context("Invalid LENDING_LOG_JSON value")?;
        }

        // Replay configuration
        if let Some(input) = var("LENDING_REPLAY_INPUT") {
            if !input.is_empty() {
                config.replay.input = Some(PathBuf::from(input));
            }
        }

        if let Some(fail_fast) = var("LENDING_REPLAY_FAIL_FAST") {
            config.replay.fail_fast = fail_fast
                .parse()
                .context("Invalid LENDING_REPLAY_FAIL_FAST value")?;
        }

        if let Some(limit) = var("LENDING_LEADERBOARD_LIMIT") {
            config.replay.leaderboard_limit = limit
                .parse()
                .context("Invalid LENDING_LEADERBOARD_LIMIT value")?;
        }

        // Store configuration
        if let Some(capacity) = var("LENDING_STORE_CAPACITY") {
            config.store.initial_capacity = capacity
                .parse()
                .context("Invalid LENDING_STORE_CAPACITY value")?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Unknown log level '{}', expected one of {:?}",
                self.logging.level,
                LOG_LEVELS
            ));
        }

        if self.replay.leaderboard_limit == 0 {
            return Err(anyhow::anyhow!("Leaderboard limit must be non-zero"));
        }

        Ok(())
    }
}

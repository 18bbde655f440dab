//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: an env filter, a console layer, and a plain-text
//! session log written through a non-blocking file appender.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::LoggingConfig;

pub const DEFAULT_FILTER: &str =
    "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn";

/// Filter directive: `RUST_LOG` first, then the configured level, then the default.
/// `debug` raises the crate's own events to debug level.
pub fn filter_directive(config: &LoggingConfig, debug: bool) -> String {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !env.trim().is_empty()
    {
        return env;
    }

    let base = config
        .level
        .clone()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    if debug {
        format!("{base},blockmind=debug")
    } else {
        base
    }
}

/// Initialize logging. The returned guard must be held for the lifetime of the process so the
/// file writer flushes.
pub fn init(config: &LoggingConfig, debug: bool) -> Result<WorkerGuard> {
    let dir = Path::new(&config.directory);
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    // Clear previous session log
    let log_path = dir.join(&config.file);
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(dir, &config.file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(filter_directive(config, debug))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_prefers_config_level() {
        // Only meaningful when RUST_LOG is not set for the test process
        if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
            return;
        }
        let mut config = LoggingConfig::default();
        assert_eq!(filter_directive(&config, false), DEFAULT_FILTER);

        config.level = Some("warn".to_string());
        assert_eq!(filter_directive(&config, false), "warn");
        assert_eq!(filter_directive(&config, true), "warn,blockmind=debug");
    }
}

//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, Console, CoinGecko, Hugging Face
//! - Application: Registry, Middleware, Router, Logging
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::middleware::{Pipeline, RateLimiter};
use crate::application::router::MessageRouter;
use crate::domain::config::{AppConfig, LoadedConfig};
use crate::infrastructure::coingecko::CoinGeckoClient;
use crate::infrastructure::huggingface::HuggingFaceClient;
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(name = "blockmind", version, about = "Cryptocurrency chat bot")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read messages from stdin instead of connecting to Matrix
    #[arg(long)]
    console: bool,

    /// Sender id used for console messages
    #[arg(long, default_value = "console")]
    sender: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let LoadedConfig {
        config,
        path: config_path,
        ignored_overrides,
    } = AppConfig::load(cli.config.as_deref())?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging, config.debug)?;
    match &config_path {
        Some(path) => tracing::info!("{}", logs::config_loaded(&path.display().to_string())),
        None => tracing::info!("{}", logs::CONFIG_DEFAULTS),
    }
    for (key, value) in &ignored_overrides {
        tracing::warn!("{}", logs::env_override_ignored(key, value));
    }
    config.validate()?;

    // 3. Services
    let market = Arc::new(CoinGeckoClient::new(&config.services.coingecko)?);
    let llm = Arc::new(HuggingFaceClient::new(&config.services.huggingface)?);

    // 4. Commands and middleware
    let registry = interface::commands::build_registry(market, llm);
    let limiter = Arc::new(RateLimiter::new(
        config.limits.rate_limit,
        config.limits.rate_limit_period(),
    ));
    let pipeline = Pipeline::standard(&config.limits, limiter, registry);
    tracing::debug!(layers = ?pipeline.layers(), "Middleware pipeline ready");

    let router = MessageRouter::new(&pipeline, config.limits.command_timeout());

    // 5. Transport
    if cli.console {
        return infrastructure::console::run(router, cli.sender).await;
    }

    let matrix = config
        .services
        .matrix
        .as_ref()
        .context("Missing services.matrix configuration (use --console to run without Matrix)")?;
    infrastructure::matrix::run(matrix, router).await
}

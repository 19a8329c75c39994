// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::Symbol;
use engine::{Engine, EngineState, StrategyEngine, TradingTask};
use execution::SimulatedExecutor;
use futures::StreamExt;
use futures::stream;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod feed;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A moving-average crossover bot with adaptive stop-losses.")]
struct Cli {
    /// Directory holding `base.toml` and the per-environment overlays.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replays every enabled pair's bar file through its strategy engine.
    Run,

    /// Loads and validates the configuration, then prints the resolved strategies.
    Check,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    let settings = app_config::load_settings_from(&cli.config_dir, &environment)
        .with_context(|| format!("failed to load settings from {}", cli.config_dir.display()))?;

    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Starting crossover bot.");

    match cli.command {
        Commands::Run => run_app(settings).await?,
        Commands::Check => check_config(&settings)?,
    }

    tracing::info!("Crossover bot has finished successfully.");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new().with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
    if level.as_str() != log_level.to_uppercase() {
        tracing::warn!(log_level, "Unrecognised log level, falling back to INFO.");
    }
}

// --- "Check" Subcommand Logic ---

fn check_config(settings: &Settings) -> Result<()> {
    for pair in &settings.pairs {
        if !pair.enabled {
            tracing::info!(symbol = %pair.symbol, "Pair is disabled.");
            continue;
        }
        let strategy = pair.strategy_settings()?;
        tracing::info!(
            symbol = %pair.symbol,
            interval = %pair.interval,
            fast = %strategy.fast,
            slow = %strategy.slow,
            stop_loss = ?strategy.stop_loss,
            data = %pair.data_path.display(),
            "Pair is valid."
        );
    }
    Ok(())
}

// --- "Run" Subcommand Logic ---

async fn run_app(settings: Settings) -> Result<()> {
    let mut engine = Engine::new();

    for pair in settings.enabled_pairs() {
        tracing::info!(symbol = %pair.symbol, "Setting up trading task.");
        let bars = feed::load_bars(&pair.data_path)?;
        let strategy = StrategyEngine::new(pair.engine_id(), pair.strategy_settings()?)?;
        let task = TradingTask::new(
            Symbol(pair.symbol.clone()),
            pair.interval.clone(),
            strategy,
            SimulatedExecutor::new(settings.simulation.clone()),
        );
        engine.add_pair(task, stream::iter(bars).boxed());
    }

    let spawned = engine.len();
    let reports = engine.run().await?;

    for report in &reports {
        let symbol = report.task.symbol();
        let portfolio = report.task.gateway().portfolio();
        match &report.result {
            Ok(summary) => tracing::info!(
                %symbol,
                bars = summary.bars,
                trades = portfolio.closed_trades.len(),
                failed_orders = summary.failed_orders,
                realized_pnl = portfolio.realized_pnl(),
                cash = portfolio.cash,
                still_open = matches!(report.task.engine().state(), EngineState::InPosition(_)),
                "Pair finished."
            ),
            Err(e) => tracing::error!(%symbol, error = %e, "Pair terminated with an error."),
        }
    }

    let failures = reports.iter().filter(|r| r.result.is_err()).count() + (spawned - reports.len());
    if failures > 0 {
        anyhow::bail!("{failures} trading task(s) terminated with an error");
    }
    Ok(())
}

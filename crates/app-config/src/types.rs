// In crates/app-config/src/types.rs

use crate::{Error, Result};
use core_types::StrategyConfig;
use execution::SimulationSettings;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use strategies::StrategySettings;
use strategies::factory::create_strategy_settings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Paper-trading parameters shared by every pair.
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub pairs: Vec<PairConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

/// Configuration for a single trading pair/asset.
#[derive(Deserialize, Debug, Clone)]
pub struct PairConfig {
    pub symbol: String,
    pub interval: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// CSV file with the bars to replay, relative to the working directory.
    pub data_path: PathBuf,
    pub strategy: StrategyConfig,
}

fn default_enabled() -> bool {
    true
}

impl PairConfig {
    /// Resolves the pair's strategy block into validated settings.
    pub fn strategy_settings(&self) -> Result<StrategySettings> {
        create_strategy_settings(&self.strategy).map_err(|source| Error::Strategy {
            symbol: self.symbol.clone(),
            source,
        })
    }

    /// Engine identifier, e.g. `BTCUSDT_1h_ema_cross_ratchet`.
    pub fn engine_id(&self) -> String {
        format!("{}_{}_{}", self.symbol, self.interval, self.strategy.name)
    }
}

impl Settings {
    /// Checks every enabled pair's strategy and rejects duplicate pairs.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pair in self.enabled_pairs() {
            if !seen.insert((pair.symbol.as_str(), pair.interval.as_str())) {
                return Err(Error::DuplicatePair(format!("{}@{}", pair.symbol, pair.interval)));
            }
            pair.strategy_settings()?;
        }
        Ok(())
    }

    pub fn enabled_pairs(&self) -> impl Iterator<Item = &PairConfig> {
        self.pairs.iter().filter(|p| p.enabled)
    }
}

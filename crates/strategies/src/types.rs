// In crates/strategies/src/types.rs

use crate::series::SeriesSettings;
use crate::stop_loss::{ReferenceSeries, SpreadTiers, StopLossSettings};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Everything a strategy engine is built from: the two series whose
/// crossover opens positions and the stop-loss policy that closes them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct StrategySettings {
    pub fast: SeriesSettings,
    pub slow: SeriesSettings,
    pub stop_loss: StopLossSettings,
}

impl StrategySettings {
    /// Fails fast on anything that would make the engine misbehave mid-stream.
    pub fn validate(&self) -> Result<()> {
        self.fast.validate("fast_period")?;
        self.slow.validate("slow_period")?;
        if let (Some(fast), Some(slow)) = (self.fast.period(), self.slow.period()) {
            if fast > slow {
                return Err(Error::invalid(
                    "fast_period",
                    format!("fast period {fast} is longer than slow period {slow}"),
                ));
            }
        }
        self.stop_loss.validate()
    }

    /// EMA(10)/EMA(20) crossover with a 2% ratcheting stop.
    pub fn ema_cross_ratchet() -> Self {
        Self {
            fast: SeriesSettings::ema(10),
            slow: SeriesSettings::ema(20),
            stop_loss: StopLossSettings::RatchetOnly { percent: 0.02 },
        }
    }

    /// Close crossing EMA(14); the stop floats 2% off the EMA.
    pub fn price_follow_ema() -> Self {
        Self {
            fast: SeriesSettings::price(),
            slow: SeriesSettings::ema(14),
            stop_loss: StopLossSettings::FixedTrailing {
                percent: 0.02,
                reference: ReferenceSeries::Slow,
            },
        }
    }

    /// SMA(10)/SMA(18) crossover with a 2% ratcheting stop.
    pub fn sma_trend_ratchet() -> Self {
        Self {
            fast: SeriesSettings::sma(10),
            slow: SeriesSettings::sma(18),
            stop_loss: StopLossSettings::RatchetOnly { percent: 0.02 },
        }
    }

    /// EMA(20)/EMA(50) crossover; 5% entry stop widened into 3% trailing
    /// stops once the averages spread apart.
    pub fn ema_spread_tiered() -> Self {
        Self {
            fast: SeriesSettings::ema(20),
            slow: SeriesSettings::ema(50),
            stop_loss: StopLossSettings::SpreadTiered {
                tiers: SpreadTiers::default(),
                entry_stop_percent: 0.05,
            },
        }
    }
}

/// Optional overrides a preset accepts through its `params` table.
#[derive(Debug, Default, Deserialize, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct PresetOverrides {
    pub fast_period: Option<u32>,
    pub slow_period: Option<u32>,
}

impl PresetOverrides {
    pub fn apply(&self, settings: &mut StrategySettings) -> Result<()> {
        if let Some(period) = self.fast_period {
            override_period(&mut settings.fast, period, "fast_period")?;
        }
        if let Some(period) = self.slow_period {
            override_period(&mut settings.slow, period, "slow_period")?;
        }
        Ok(())
    }
}

fn override_period(series: &mut SeriesSettings, period: u32, name: &'static str) -> Result<()> {
    if series.period().is_none() {
        return Err(Error::invalid(name, "the price series has no period"));
    }
    series.period = period;
    Ok(())
}

// In crates/strategies/src/series.rs

//! Recursively updated moving averages, one instance per tracked indicator.
//!
//! Seeding is fixed for the life of a series:
//! - EMA: the first price seeds the value, then `price * k + prev * (1 - k)`
//!   with `k = 2 / (period + 1)`.
//! - SMA: the mean over the bars seen so far until `period` bars have
//!   arrived, then the mean of the last `period` bars.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use ta::Next;
use ta::indicators::{ExponentialMovingAverage as Ema, SimpleMovingAverage as Sma};

/// Longest accepted averaging period. The SMA keeps a buffer of `period`
/// prices, allocated up front.
pub const MAX_PERIOD: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Ema,
    Sma,
    /// The raw close, for strategies that cross price against an average.
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSettings {
    pub kind: SeriesKind,
    /// Ignored for `Price`.
    #[serde(default)]
    pub period: u32,
}

impl SeriesSettings {
    pub fn ema(period: u32) -> Self {
        Self { kind: SeriesKind::Ema, period }
    }

    pub fn sma(period: u32) -> Self {
        Self { kind: SeriesKind::Sma, period }
    }

    pub fn price() -> Self {
        Self { kind: SeriesKind::Price, period: 0 }
    }

    /// The averaging period, or `None` for the price series.
    pub fn period(&self) -> Option<u32> {
        match self.kind {
            SeriesKind::Price => None,
            SeriesKind::Ema | SeriesKind::Sma => Some(self.period),
        }
    }

    pub fn validate(&self, name: &'static str) -> Result<()> {
        match self.period() {
            Some(0) => Err(Error::invalid(name, "moving average period must be greater than 0")),
            Some(period) if period > MAX_PERIOD => Err(Error::invalid(
                name,
                format!("moving average period {period} exceeds the maximum of {MAX_PERIOD}"),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SeriesSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SeriesKind::Ema => write!(f, "EMA({})", self.period),
            SeriesKind::Sma => write!(f, "SMA({})", self.period),
            SeriesKind::Price => f.write_str("PRICE"),
        }
    }
}

#[derive(Debug, Clone)]
enum Recurrence {
    Exponential(Ema),
    Simple(Sma),
    Price,
}

/// A stateful moving average advanced exactly once per bar.
#[derive(Debug, Clone)]
pub struct RecurrenceSeries {
    settings: SeriesSettings,
    inner: Recurrence,
    value: Option<f64>,
    bars_seen: u64,
}

impl RecurrenceSeries {
    pub fn new(settings: SeriesSettings) -> Result<Self> {
        settings.validate("period")?;
        let inner = match settings.kind {
            SeriesKind::Ema => Recurrence::Exponential(
                Ema::new(settings.period as usize)
                    .map_err(|_| Error::invalid("period", format!("rejected EMA period {}", settings.period)))?,
            ),
            SeriesKind::Sma => Recurrence::Simple(
                Sma::new(settings.period as usize)
                    .map_err(|_| Error::invalid("period", format!("rejected SMA period {}", settings.period)))?,
            ),
            SeriesKind::Price => Recurrence::Price,
        };
        Ok(Self {
            settings,
            inner,
            value: None,
            bars_seen: 0,
        })
    }

    pub fn ema(period: u32) -> Result<Self> {
        Self::new(SeriesSettings::ema(period))
    }

    pub fn sma(period: u32) -> Result<Self> {
        Self::new(SeriesSettings::sma(period))
    }

    pub fn price() -> Self {
        Self {
            settings: SeriesSettings::price(),
            inner: Recurrence::Price,
            value: None,
            bars_seen: 0,
        }
    }

    /// Advances the series by one bar and returns the new value.
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match &mut self.inner {
            Recurrence::Exponential(ema) => ema.next(price),
            Recurrence::Simple(sma) => sma.next(price),
            Recurrence::Price => price,
        };
        self.value = Some(next);
        self.bars_seen += 1;
        next
    }

    /// The latest value, `None` until the first update.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn settings(&self) -> SeriesSettings {
        self.settings
    }

    pub fn bars_seen(&self) -> u64 {
        self.bars_seen
    }

    /// Smoothing constant of the exponential variant.
    pub fn smoothing(&self) -> Option<f64> {
        match self.settings.kind {
            SeriesKind::Ema => Some(2.0 / (self.settings.period as f64 + 1.0)),
            _ => None,
        }
    }
}

impl fmt::Display for RecurrenceSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.settings.fmt(f)
    }
}

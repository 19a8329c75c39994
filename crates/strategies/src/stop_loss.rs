// In crates/strategies/src/stop_loss.rs

//! Stop-loss policies evaluated once per bar while a position is open.
//!
//! A policy instance is created together with a position and dropped when the
//! position closes. The only side effect of `evaluate` on the position is its
//! `current_stop`.

use crate::{Error, Result};
use core_types::{Position, Side};
use serde::{Deserialize, Serialize};

/// Current-bar indicator readings handed to a policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorContext {
    pub fast: f64,
    pub slow: f64,
}

impl IndicatorContext {
    /// `|fast - slow| / slow * 100`. A zero slow value reads as no spread.
    pub fn spread_percent(&self) -> f64 {
        if self.slow == 0.0 {
            return 0.0;
        }
        ((self.fast - self.slow) / self.slow).abs() * 100.0
    }

    fn reference(&self, reference: ReferenceSeries) -> f64 {
        match reference {
            ReferenceSeries::Fast => self.fast,
            ReferenceSeries::Slow => self.slow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    Hold,
    Close,
}

/// Places a stop `percent` away from `base` on the losing side of `side`.
pub fn offset_stop(side: Side, base: f64, percent: f64) -> f64 {
    match side {
        Side::Long => base * (1.0 - percent),
        Side::Short => base * (1.0 + percent),
    }
}

/// Which indicator a floating stop follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSeries {
    Fast,
    #[default]
    Slow,
}

/// Thresholds are in percent (`3.0` = 3%), stop widths are fractions (`0.03`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadTiers {
    pub high_threshold: f64,
    pub high_percent: f64,
    pub medium_threshold: f64,
    pub medium_percent: f64,
}

impl Default for SpreadTiers {
    fn default() -> Self {
        Self {
            high_threshold: 3.0,
            high_percent: 0.03,
            medium_threshold: 2.0,
            medium_percent: 0.03,
        }
    }
}

/// Slack applied to tier boundaries so a decimal 3% spread computed in
/// floating point (e.g. 30.9 vs 30) still counts as 3%.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

impl SpreadTiers {
    /// Tier for a spread reading. Both boundaries are inclusive, up to
    /// rounding error.
    pub fn select(&self, spread_percent: f64) -> StopTier {
        let spread = spread_percent + THRESHOLD_TOLERANCE;
        if spread >= self.high_threshold {
            StopTier::High
        } else if spread >= self.medium_threshold {
            StopTier::Medium
        } else {
            StopTier::Entry
        }
    }
}

/// Which band a spread-tiered stop is currently anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTier {
    /// Fixed stop set at entry.
    Entry,
    /// Trailing the slow indicator.
    Medium,
    /// Trailing the fast indicator.
    High,
}

/// Configuration of the stop-loss policy a strategy opens positions with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopLossSettings {
    FixedTrailing {
        percent: f64,
        #[serde(default)]
        reference: ReferenceSeries,
    },
    RatchetOnly {
        percent: f64,
    },
    SpreadTiered {
        #[serde(default)]
        tiers: SpreadTiers,
        entry_stop_percent: f64,
    },
}

fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(Error::invalid(
            name,
            format!("expected a fraction in (0, 1), got {value}"),
        ));
    }
    Ok(())
}

impl StopLossSettings {
    pub fn validate(&self) -> Result<()> {
        match self {
            StopLossSettings::FixedTrailing { percent, .. } => check_fraction("percent", *percent),
            StopLossSettings::RatchetOnly { percent } => check_fraction("percent", *percent),
            StopLossSettings::SpreadTiered {
                tiers,
                entry_stop_percent,
            } => {
                check_fraction("entry_stop_percent", *entry_stop_percent)?;
                check_fraction("high_percent", tiers.high_percent)?;
                check_fraction("medium_percent", tiers.medium_percent)?;
                if !(tiers.medium_threshold > 0.0 && tiers.medium_threshold < tiers.high_threshold) {
                    return Err(Error::invalid(
                        "medium_threshold",
                        format!(
                            "tier thresholds must satisfy 0 < medium < high, got {} and {}",
                            tiers.medium_threshold, tiers.high_threshold
                        ),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Builds the policy for a freshly opened position and returns it with
    /// the initial stop price.
    pub fn open(&self, side: Side, entry_price: f64, ctx: &IndicatorContext) -> (StopLossPolicy, f64) {
        match *self {
            StopLossSettings::FixedTrailing { percent, reference } => {
                let policy = FixedTrailing { percent, reference };
                let stop = policy.stop_for(side, ctx);
                (StopLossPolicy::FixedTrailing(policy), stop)
            }
            StopLossSettings::RatchetOnly { percent } => (
                StopLossPolicy::RatchetOnly(RatchetOnly { percent }),
                offset_stop(side, entry_price, percent),
            ),
            StopLossSettings::SpreadTiered {
                tiers,
                entry_stop_percent,
            } => {
                let entry_stop = offset_stop(side, entry_price, entry_stop_percent);
                let policy = SpreadTiered {
                    tiers,
                    entry_stop,
                    tier: StopTier::Entry,
                };
                (StopLossPolicy::SpreadTiered(policy), entry_stop)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StopLossSettings::FixedTrailing { .. } => "fixed_trailing",
            StopLossSettings::RatchetOnly { .. } => "ratchet_only",
            StopLossSettings::SpreadTiered { .. } => "spread_tiered",
        }
    }
}

/// Floating stop recomputed from an indicator every bar. May loosen.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTrailing {
    percent: f64,
    reference: ReferenceSeries,
}

impl FixedTrailing {
    fn stop_for(&self, side: Side, ctx: &IndicatorContext) -> f64 {
        offset_stop(side, ctx.reference(self.reference), self.percent)
    }

    fn evaluate(&mut self, position: &mut Position, price: f64, ctx: &IndicatorContext) -> StopDecision {
        position.current_stop = self.stop_for(position.side, ctx);
        breach(position, price)
    }
}

/// Stop set from the entry price and only ever tightened afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RatchetOnly {
    percent: f64,
}

impl RatchetOnly {
    fn evaluate(&mut self, position: &mut Position, price: f64) -> StopDecision {
        if position.is_stop_breached(price) {
            return StopDecision::Close;
        }

        let stop = position.current_stop;
        let distance = if stop == 0.0 { f64::INFINITY } else { ((stop - price) / stop).abs() };
        if distance > self.percent {
            let candidate = offset_stop(position.side, price, self.percent);
            let tightened = match position.side {
                Side::Long => stop.max(candidate),
                Side::Short => stop.min(candidate),
            };
            if tightened != stop {
                tracing::debug!(side = ?position.side, from = stop, to = tightened, "Ratcheting stop.");
                position.current_stop = tightened;
            }
        }
        StopDecision::Hold
    }
}

/// Stop width chosen from the fast/slow spread on every bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadTiered {
    tiers: SpreadTiers,
    entry_stop: f64,
    tier: StopTier,
}

impl SpreadTiered {
    fn evaluate(&mut self, position: &mut Position, price: f64, ctx: &IndicatorContext) -> StopDecision {
        let tier = self.tiers.select(ctx.spread_percent());
        if tier != self.tier {
            tracing::debug!(from = ?self.tier, to = ?tier, spread = ctx.spread_percent(), "Stop tier changed.");
            self.tier = tier;
        }
        position.current_stop = match tier {
            StopTier::High => offset_stop(position.side, ctx.fast, self.tiers.high_percent),
            StopTier::Medium => offset_stop(position.side, ctx.slow, self.tiers.medium_percent),
            StopTier::Entry => self.entry_stop,
        };
        breach(position, price)
    }
}

fn breach(position: &Position, price: f64) -> StopDecision {
    if position.is_stop_breached(price) {
        StopDecision::Close
    } else {
        StopDecision::Hold
    }
}

/// The per-position stop-loss rule.
#[derive(Debug, Clone, PartialEq)]
pub enum StopLossPolicy {
    FixedTrailing(FixedTrailing),
    RatchetOnly(RatchetOnly),
    SpreadTiered(SpreadTiered),
}

impl StopLossPolicy {
    /// Updates the position's stop for this bar and reports whether the
    /// position should be closed. Never closes anything itself.
    pub fn evaluate(&mut self, position: &mut Position, price: f64, ctx: &IndicatorContext) -> StopDecision {
        match self {
            StopLossPolicy::FixedTrailing(p) => p.evaluate(position, price, ctx),
            StopLossPolicy::RatchetOnly(p) => p.evaluate(position, price),
            StopLossPolicy::SpreadTiered(p) => p.evaluate(position, price, ctx),
        }
    }

    /// The active tier, for spread-tiered policies.
    pub fn tier(&self) -> Option<StopTier> {
        match self {
            StopLossPolicy::SpreadTiered(p) => Some(p.tier),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StopLossPolicy::FixedTrailing(_) => "fixed_trailing",
            StopLossPolicy::RatchetOnly(_) => "ratchet_only",
            StopLossPolicy::SpreadTiered(_) => "spread_tiered",
        }
    }
}

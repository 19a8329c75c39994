// In crates/core-types/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trading instrument identifier, e.g. "BTCUSDT".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The direction of a position or of the order that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// `+1.0` for Long, `-1.0` for Short.
    pub fn sign(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

/// One OHLC price bar for a fixed interval.
///
/// Bars are immutable once produced and arrive in strictly increasing
/// `open_time` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Bar open time in milliseconds since the Unix epoch.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Kline {
    /// A flat bar where every price equals `close`. Handy for feeds that
    /// only carry closing prices.
    pub fn from_close(open_time: i64, close: f64) -> Self {
        Self {
            open_time,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// The single live position an engine may hold.
///
/// The stop price lives on the position itself; it is only mutated by the
/// active stop-loss policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    /// Fill price reported by the order collaborator.
    pub entry_price: f64,
    /// Index of the bar (1-based, per engine) on which the position opened.
    pub opened_at_bar: u64,
    pub current_stop: f64,
    /// Identifier returned by the order collaborator.
    pub order_id: String,
}

impl Position {
    /// Whether `price` has crossed the stop in the adverse direction.
    pub fn is_stop_breached(&self, price: f64) -> bool {
        match self.side {
            Side::Long => price <= self.current_stop,
            Side::Short => price >= self.current_stop,
        }
    }
}

// In crates/execution/src/types.rs

use core_types::Side;
use serde::{Deserialize, Serialize};

/// Confirmation of an opening order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAck {
    pub order_id: String,
    /// Fill price, including any slippage.
    pub price: f64,
}

/// Confirmation of a closing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub order_id: String,
    pub price: f64,
    pub fee: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    /// Starting cash balance in quote currency.
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,

    /// The taker fee for the exchange (e.g., 0.0004 for 0.04%).
    #[serde(default)]
    pub taker_fee: f64,

    /// The simulated slippage percentage for market orders (e.g., 0.0005 for 0.05%).
    #[serde(default)]
    pub slippage_percent: f64,

    /// Notional committed per position, in quote currency.
    #[serde(default = "default_position_size")]
    pub position_size: f64,
}

fn default_initial_cash() -> f64 {
    10_000.0
}

fn default_position_size() -> f64 {
    1_000.0
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_cash: default_initial_cash(),
            taker_fee: 0.0,
            slippage_percent: 0.0,
            position_size: default_position_size(),
        }
    }
}

/// A position the simulator has opened and not yet closed.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenLot {
    pub order_id: String,
    pub side: Side,
    pub quantity: f64,
    pub entry_price: f64,
}

/// A completed round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedTrade {
    pub order_id: String,
    pub side: Side,
    pub quantity: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Net of the closing fee.
    pub pnl: f64,
}

/// Represents the state of the simulated trading account.
#[derive(Debug, Clone)]
pub struct Portfolio {
    /// The cash balance (e.g., in USDT).
    pub cash: f64,

    /// The lot currently open, if any.
    pub open_lot: Option<OpenLot>,

    pub closed_trades: Vec<ClosedTrade>,
}

impl Portfolio {
    /// Creates a new portfolio with an initial cash balance.
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            open_lot: None,
            closed_trades: Vec::new(),
        }
    }

    /// Sum of net P&L over closed trades.
    pub fn realized_pnl(&self) -> f64 {
        self.closed_trades.iter().map(|t| t.pnl).sum()
    }
}

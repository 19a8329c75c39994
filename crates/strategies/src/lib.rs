// In crates/strategies/src/lib.rs

//! Building blocks of a crossover strategy: recursively updated moving
//! averages, two-value rolling windows, the crossover rule and the stop-loss
//! policies applied to an open position.

pub mod crossover;
pub mod error;
pub mod factory;
pub mod series;
pub mod stop_loss;
pub mod types;
pub mod window;

pub use crossover::{Cross, detect};
pub use error::{Error, Result};
pub use series::{RecurrenceSeries, SeriesKind, SeriesSettings};
pub use stop_loss::{IndicatorContext, StopDecision, StopLossPolicy, StopLossSettings, StopTier};
pub use types::StrategySettings;
pub use window::RollingWindow;

// In crates/engine/src/task.rs

use crate::error::EngineError;
use crate::strategy_engine::{BarOutcome, StrategyEngine};
use core_types::{Kline, Symbol};
use execution::OrderGateway;
use futures::{Stream, StreamExt};

/// Counters for one task's run over its bar stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub bars: u64,
    /// Bars dropped because their open time did not advance.
    pub out_of_order: u64,
    pub entries: u64,
    pub exits: u64,
    pub failed_orders: u64,
}

/// A self-contained task that drives one strategy engine for a single asset.
pub struct TradingTask<G> {
    symbol: Symbol,
    interval: String,
    engine: StrategyEngine,
    gateway: G,
    last_open_time: Option<i64>,
    summary: TaskSummary,
}

impl<G: OrderGateway> TradingTask<G> {
    pub fn new(symbol: Symbol, interval: impl Into<String>, engine: StrategyEngine, gateway: G) -> Self {
        Self {
            symbol,
            interval: interval.into(),
            engine,
            gateway,
            last_open_time: None,
            summary: TaskSummary::default(),
        }
    }

    /// Consumes the stream bar by bar until it ends.
    ///
    /// Failed order requests are logged and the loop moves on to the next bar;
    /// any other engine error ends the run.
    pub async fn run<S>(&mut self, bars: S) -> Result<TaskSummary, EngineError>
    where
        S: Stream<Item = Kline> + Unpin,
    {
        tracing::info!(
            symbol = %self.symbol,
            interval = %self.interval,
            engine = self.engine.id(),
            gateway = self.gateway.name(),
            "Starting trading task."
        );

        let mut bars = bars;
        while let Some(kline) = bars.next().await {
            if let Some(last) = self.last_open_time {
                if kline.open_time <= last {
                    tracing::warn!(symbol = %self.symbol, open_time = kline.open_time, last, "Dropping out-of-order bar.");
                    self.summary.out_of_order += 1;
                    continue;
                }
            }
            self.last_open_time = Some(kline.open_time);
            self.summary.bars += 1;

            match self.engine.on_bar(&kline, &mut self.gateway).await {
                Ok(BarOutcome::Opened { .. }) => self.summary.entries += 1,
                Ok(BarOutcome::Closed { side, entry_price, exit_price }) => {
                    self.summary.exits += 1;
                    tracing::info!(
                        symbol = %self.symbol,
                        ?side,
                        entry_price,
                        exit_price,
                        "Trade completed."
                    );
                }
                Ok(_) => {}
                Err(e @ EngineError::OrderRequestFailed { .. }) => {
                    self.summary.failed_orders += 1;
                    tracing::warn!(symbol = %self.symbol, open_time = kline.open_time, error = %e, "Order request failed; signal dropped.");
                }
                Err(e) => {
                    tracing::error!(symbol = %self.symbol, error = %e, "Trading task aborted.");
                    return Err(e);
                }
            }
        }

        tracing::info!(symbol = %self.symbol, summary = ?self.summary, "Bar stream finished.");
        Ok(self.summary)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn engine(&self) -> &StrategyEngine {
        &self.engine
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

// In crates/engine/src/strategy_engine.rs

use crate::error::{EngineError, OrderAction, Result};
use core_types::{Kline, Position, Side};
use execution::OrderGateway;
use strategies::{
    IndicatorContext, RecurrenceSeries, RollingWindow, StopDecision, StopLossPolicy, StopTier,
    StrategySettings,
};

/// Where the engine stands between bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Flat,
    InPosition(Side),
}

/// What a single bar did to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BarOutcome {
    /// Fewer than two bars seen; indicators are still accumulating history.
    WarmingUp,
    /// Flat and no crossover on this bar.
    NoSignal,
    Opened { side: Side, price: f64, stop: f64 },
    /// Position kept; `stop` is the stop after this bar's policy update.
    Held { stop: f64 },
    Closed { side: Side, entry_price: f64, exit_price: f64 },
}

/// Current and previous readings of both series, for charting and reports.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub fast: Option<f64>,
    pub slow: Option<f64>,
    pub previous_fast: Option<f64>,
    pub previous_slow: Option<f64>,
}

/// A position and the stop-loss policy instance that lives and dies with it.
#[derive(Debug, Clone)]
struct OpenTrade {
    position: Position,
    policy: StopLossPolicy,
}

/// Per-instrument crossover state machine.
///
/// Owns both recurrence series, their rolling windows and at most one open
/// position. Order requests go through the gateway passed to [`on_bar`];
/// nothing transitions unless that request succeeds.
///
/// [`on_bar`]: StrategyEngine::on_bar
#[derive(Debug)]
pub struct StrategyEngine {
    /// A unique identifier for this engine (e.g., "BTCUSDT_1h_EMA(10)xEMA(20)").
    id: String,
    settings: StrategySettings,
    fast: RecurrenceSeries,
    slow: RecurrenceSeries,
    fast_window: RollingWindow<f64>,
    slow_window: RollingWindow<f64>,
    open_trade: Option<OpenTrade>,
    bar_index: u64,
}

impl StrategyEngine {
    /// Validates `settings` and builds a flat engine. Bad periods or
    /// percents fail here, before any bar is streamed.
    pub fn new(id: impl Into<String>, settings: StrategySettings) -> Result<Self> {
        settings.validate()?;
        let id = id.into();
        tracing::info!(
            id = %id,
            fast = %settings.fast,
            slow = %settings.slow,
            stop_loss = settings.stop_loss.name(),
            "Creating new strategy engine."
        );

        Ok(Self {
            id,
            fast: RecurrenceSeries::new(settings.fast)?,
            slow: RecurrenceSeries::new(settings.slow)?,
            settings,
            fast_window: RollingWindow::new(),
            slow_window: RollingWindow::new(),
            open_trade: None,
            bar_index: 0,
        })
    }

    /// Processes one bar to completion. At most one state transition happens.
    ///
    /// An `Err` means an order request failed: the engine is left exactly in
    /// the state it had before the request and the signal is not retried.
    pub async fn on_bar<G>(&mut self, bar: &Kline, gateway: &mut G) -> Result<BarOutcome>
    where
        G: OrderGateway + ?Sized,
    {
        self.bar_index += 1;
        let fast = self.fast.update(bar.close);
        let slow = self.slow.update(bar.close);
        self.fast_window.push(fast);
        self.slow_window.push(slow);
        let ctx = IndicatorContext { fast, slow };

        if let Some(trade) = self.open_trade.as_mut() {
            if trade.policy.evaluate(&mut trade.position, bar.close, &ctx) == StopDecision::Hold {
                return Ok(BarOutcome::Held {
                    stop: trade.position.current_stop,
                });
            }
            return self.close_position(bar, gateway).await;
        }

        if !(self.fast_window.is_warm() && self.slow_window.is_warm()) {
            tracing::debug!(id = %self.id, bar = self.bar_index, "Warming up indicators.");
            return Ok(BarOutcome::WarmingUp);
        }

        let cross = strategies::detect(&self.fast_window, &self.slow_window)?;
        match cross.entry_side() {
            Some(side) => self.open_position(side, bar, &ctx, gateway).await,
            None => Ok(BarOutcome::NoSignal),
        }
    }

    async fn open_position<G>(
        &mut self,
        side: Side,
        bar: &Kline,
        ctx: &IndicatorContext,
        gateway: &mut G,
    ) -> Result<BarOutcome>
    where
        G: OrderGateway + ?Sized,
    {
        tracing::info!(id = %self.id, ?side, close = bar.close, fast = ctx.fast, slow = ctx.slow, "Crossover detected.");

        let ack = gateway
            .create_order(side, bar.close)
            .await
            .map_err(|source| EngineError::OrderRequestFailed {
                action: OrderAction::Open(side),
                source,
            })?;

        let (policy, stop) = self.settings.stop_loss.open(side, ack.price, ctx);
        tracing::info!(
            id = %self.id,
            order_id = %ack.order_id,
            ?side,
            entry_price = ack.price,
            stop,
            policy = policy.name(),
            "Position opened."
        );

        self.open_trade = Some(OpenTrade {
            position: Position {
                side,
                entry_price: ack.price,
                opened_at_bar: self.bar_index,
                current_stop: stop,
                order_id: ack.order_id,
            },
            policy,
        });
        Ok(BarOutcome::Opened {
            side,
            price: ack.price,
            stop,
        })
    }

    async fn close_position<G>(&mut self, bar: &Kline, gateway: &mut G) -> Result<BarOutcome>
    where
        G: OrderGateway + ?Sized,
    {
        let Some(trade) = self.open_trade.as_ref() else {
            return Ok(BarOutcome::NoSignal);
        };
        tracing::info!(
            id = %self.id,
            side = ?trade.position.side,
            close = bar.close,
            stop = trade.position.current_stop,
            "Stop-loss triggered! Closing position."
        );

        let fill = gateway
            .close_order(&trade.position, bar.close)
            .await
            .map_err(|source| EngineError::OrderRequestFailed {
                action: OrderAction::Close,
                source,
            })?;

        let position = trade.position.clone();
        self.open_trade = None;
        tracing::info!(
            id = %self.id,
            order_id = %position.order_id,
            entry_price = position.entry_price,
            exit_price = fill.price,
            bars_held = self.bar_index - position.opened_at_bar,
            "Position closed."
        );
        Ok(BarOutcome::Closed {
            side: position.side,
            entry_price: position.entry_price,
            exit_price: fill.price,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    pub fn state(&self) -> EngineState {
        match &self.open_trade {
            Some(trade) => EngineState::InPosition(trade.position.side),
            None => EngineState::Flat,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.open_trade.as_ref().map(|t| &t.position)
    }

    /// The active spread tier, when the open position uses a tiered stop.
    pub fn stop_tier(&self) -> Option<StopTier> {
        self.open_trade.as_ref().and_then(|t| t.policy.tier())
    }

    /// Number of bars processed so far.
    pub fn bar_index(&self) -> u64 {
        self.bar_index
    }

    pub fn indicators(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            fast: self.fast_window.current(),
            slow: self.slow_window.current(),
            previous_fast: self.fast_window.previous(),
            previous_slow: self.slow_window.previous(),
        }
    }

    /// Named current values, in chart order.
    pub fn figures(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![("fast", self.fast.value()), ("slow", self.slow.value())]
    }
}

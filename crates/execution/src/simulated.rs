// In crates/execution/src/simulated.rs

use crate::types::{ClosedTrade, Fill, OpenLot, OrderAck, Portfolio, SimulationSettings};
use crate::{Error, OrderGateway, Result};
use async_trait::async_trait;
use core_types::{Position, Side};

/// A paper-trading gateway that fills every order at the requested price,
/// adjusted for slippage, and charges the taker fee from cash.
#[derive(Debug)]
pub struct SimulatedExecutor {
    settings: SimulationSettings,
    portfolio: Portfolio,
    next_order_id: u64,
}

impl SimulatedExecutor {
    pub fn new(settings: SimulationSettings) -> Self {
        let portfolio = Portfolio::new(settings.initial_cash);
        Self {
            settings,
            portfolio,
            next_order_id: 1,
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    fn entry_price(&self, side: Side, price: f64) -> f64 {
        // Slippage always works against the order.
        match side {
            Side::Long => price * (1.0 + self.settings.slippage_percent),
            Side::Short => price * (1.0 - self.settings.slippage_percent),
        }
    }

    fn exit_price(&self, side: Side, price: f64) -> f64 {
        match side {
            Side::Long => price * (1.0 - self.settings.slippage_percent),
            Side::Short => price * (1.0 + self.settings.slippage_percent),
        }
    }

    /// Processes an entry order (opening a new long or short position).
    fn process_entry(&mut self, side: Side, price: f64) -> Result<OrderAck> {
        if let Some(lot) = &self.portfolio.open_lot {
            return Err(Error::ExecutionFailed {
                reason: format!("order {} is still open", lot.order_id),
            });
        }
        if !(price.is_finite() && price > 0.0) {
            return Err(Error::ExecutionFailed {
                reason: format!("cannot fill at price {price}"),
            });
        }

        let execution_price = self.entry_price(side, price);
        let quantity = self.settings.position_size / execution_price;
        let fee = self.settings.position_size * self.settings.taker_fee;

        // Veto if not enough cash to cover the fee. A real exchange would check margin.
        if self.portfolio.cash < fee {
            return Err(Error::ExecutionFailed {
                reason: "Insufficient cash for fees".to_string(),
            });
        }
        self.portfolio.cash -= fee;

        let order_id = format!("sim-{}", self.next_order_id);
        self.next_order_id += 1;
        self.portfolio.open_lot = Some(OpenLot {
            order_id: order_id.clone(),
            side,
            quantity,
            entry_price: execution_price,
        });

        tracing::info!(%order_id, ?side, price = execution_price, quantity, fee, "Simulated entry filled.");
        Ok(OrderAck {
            order_id,
            price: execution_price,
        })
    }

    /// Processes a closing order.
    fn process_close(&mut self, position: &Position, price: f64) -> Result<Fill> {
        let lot = match self.portfolio.open_lot.take() {
            Some(lot) if lot.order_id == position.order_id => lot,
            other => {
                self.portfolio.open_lot = other;
                return Err(Error::NoOpenPosition {
                    order_id: position.order_id.clone(),
                });
            }
        };

        let execution_price = self.exit_price(lot.side, price);
        let gross = (execution_price - lot.entry_price) * lot.quantity * lot.side.sign();
        let fee = lot.quantity * execution_price * self.settings.taker_fee;
        let pnl = gross - fee;
        self.portfolio.cash += pnl;

        tracing::info!(order_id = %lot.order_id, side = ?lot.side, price = execution_price, pnl, "Simulated exit filled.");
        self.portfolio.closed_trades.push(ClosedTrade {
            order_id: lot.order_id.clone(),
            side: lot.side,
            quantity: lot.quantity,
            entry_price: lot.entry_price,
            exit_price: execution_price,
            pnl,
        });

        Ok(Fill {
            order_id: lot.order_id,
            price: execution_price,
            fee,
        })
    }
}

#[async_trait]
impl OrderGateway for SimulatedExecutor {
    fn name(&self) -> &'static str {
        "SimulatedExecutor"
    }

    async fn create_order(&mut self, side: Side, price: f64) -> Result<OrderAck> {
        self.process_entry(side, price)
    }

    async fn close_order(&mut self, position: &Position, price: f64) -> Result<Fill> {
        self.process_close(position, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn executor(taker_fee: f64, slippage_percent: f64) -> SimulatedExecutor {
        SimulatedExecutor::new(SimulationSettings {
            initial_cash: 1_000.0,
            taker_fee,
            slippage_percent,
            position_size: 500.0,
        })
    }

    fn position_for(ack: &OrderAck, side: Side) -> Position {
        Position {
            side,
            entry_price: ack.price,
            opened_at_bar: 1,
            current_stop: 0.0,
            order_id: ack.order_id.clone(),
        }
    }

    #[tokio::test]
    async fn long_round_trip_books_profit() {
        let mut sim = executor(0.0, 0.0);
        let ack = sim.create_order(Side::Long, 100.0).await.unwrap();
        assert_eq!(ack.order_id, "sim-1");
        assert_relative_eq!(ack.price, 100.0);

        let fill = sim.close_order(&position_for(&ack, Side::Long), 110.0).await.unwrap();
        assert_relative_eq!(fill.price, 110.0);

        let trade = &sim.portfolio().closed_trades[0];
        assert_relative_eq!(trade.pnl, 50.0, epsilon = 1e-9);
        assert_relative_eq!(sim.portfolio().cash, 1_050.0, epsilon = 1e-9);
        assert!(sim.portfolio().open_lot.is_none());
    }

    #[tokio::test]
    async fn short_profits_from_falling_price() {
        let mut sim = executor(0.0, 0.0);
        let ack = sim.create_order(Side::Short, 100.0).await.unwrap();
        sim.close_order(&position_for(&ack, Side::Short), 90.0).await.unwrap();
        assert_relative_eq!(sim.portfolio().realized_pnl(), 50.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn slippage_and_fees_work_against_the_trader() {
        let mut sim = executor(0.001, 0.01);
        let ack = sim.create_order(Side::Long, 100.0).await.unwrap();
        assert_relative_eq!(ack.price, 101.0, epsilon = 1e-9);
        assert_relative_eq!(sim.portfolio().cash, 999.5, epsilon = 1e-9);

        let fill = sim.close_order(&position_for(&ack, Side::Long), 100.0).await.unwrap();
        assert_relative_eq!(fill.price, 99.0, epsilon = 1e-9);
        assert!(sim.portfolio().realized_pnl() < 0.0);
    }

    #[tokio::test]
    async fn second_entry_while_open_is_rejected() {
        let mut sim = executor(0.0, 0.0);
        sim.create_order(Side::Long, 100.0).await.unwrap();
        assert!(matches!(
            sim.create_order(Side::Short, 100.0).await,
            Err(Error::ExecutionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn closing_unknown_order_keeps_open_lot() {
        let mut sim = executor(0.0, 0.0);
        let ack = sim.create_order(Side::Long, 100.0).await.unwrap();
        let mut stranger = position_for(&ack, Side::Long);
        stranger.order_id = "sim-99".into();

        assert!(matches!(
            sim.close_order(&stranger, 100.0).await,
            Err(Error::NoOpenPosition { .. })
        ));
        assert_eq!(sim.portfolio().open_lot.as_ref().map(|l| l.order_id.as_str()), Some("sim-1"));
    }

    #[tokio::test]
    async fn fee_larger_than_cash_is_vetoed() {
        let mut sim = SimulatedExecutor::new(SimulationSettings {
            initial_cash: 0.1,
            taker_fee: 0.01,
            slippage_percent: 0.0,
            position_size: 500.0,
        });
        assert!(sim.create_order(Side::Long, 100.0).await.is_err());
        assert!(sim.portfolio().open_lot.is_none());
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use core_types::{Position, Side};
pub use core_types::Kline;
use execution::{Error, Fill, OrderAck, OrderGateway, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { side: Side, price: f64 },
    Close { order_id: String, price: f64 },
}

/// Fills everything at the requested price unless told to fail, and records
/// every request it receives.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub calls: Vec<Call>,
    pub fail_create: bool,
    pub fail_close: bool,
    pub panic_on_create: bool,
    pub next_id: u64,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creates(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Create { .. })).count()
    }

    pub fn closes(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Close { .. })).count()
    }
}

#[async_trait]
impl OrderGateway for RecordingGateway {
    fn name(&self) -> &'static str {
        "RecordingGateway"
    }

    async fn create_order(&mut self, side: Side, price: f64) -> Result<OrderAck> {
        self.calls.push(Call::Create { side, price });
        if self.panic_on_create {
            panic!("gateway crashed while opening {side:?}");
        }
        if self.fail_create {
            return Err(Error::ExecutionFailed {
                reason: "create rejected".into(),
            });
        }
        self.next_id += 1;
        Ok(OrderAck {
            order_id: format!("rec-{}", self.next_id),
            price,
        })
    }

    async fn close_order(&mut self, position: &Position, price: f64) -> Result<Fill> {
        self.calls.push(Call::Close {
            order_id: position.order_id.clone(),
            price,
        });
        if self.fail_close {
            return Err(Error::ExecutionFailed {
                reason: "close rejected".into(),
            });
        }
        Ok(Fill {
            order_id: position.order_id.clone(),
            price,
            fee: 0.0,
        })
    }
}

pub fn bars(closes: &[f64]) -> Vec<Kline> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Kline::from_close(i as i64 * 60_000, c))
        .collect()
}

/// A falling leg into a sharp rebound. With EMA(10) against EMA(20) the only
/// crossover is upward, on the fifteenth bar at a close of 106.
pub const REBOUND: [f64; 15] = [
    100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 94.0, 93.0, 92.0, 91.0, 94.0, 97.0, 100.0, 103.0, 106.0,
];

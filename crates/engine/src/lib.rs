// In crates/engine/src/lib.rs

pub mod error;
pub mod strategy_engine;
pub mod task;

pub use error::{EngineError, OrderAction, Result};
pub use strategy_engine::{BarOutcome, EngineState, IndicatorSnapshot, StrategyEngine};
pub use task::{TaskSummary, TradingTask};

use core_types::Kline;
use execution::OrderGateway;
use futures::future;
use futures::stream::BoxStream;

/// A finished, pinned source of bars for one trading task.
pub type BarStream = BoxStream<'static, Kline>;

/// The outcome of one spawned task: the task itself (so its gateway and
/// engine can be inspected) plus how its run ended.
pub struct TaskReport<G> {
    pub task: TradingTask<G>,
    pub result: Result<TaskSummary>,
}

/// The portfolio-level orchestrator. Runs one `TradingTask` per pair
/// concurrently and collects them when their streams end.
pub struct Engine<G> {
    pairs: Vec<(TradingTask<G>, BarStream)>,
}

impl<G> Default for Engine<G> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<G> Engine<G>
where
    G: OrderGateway + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pair(&mut self, task: TradingTask<G>, bars: BarStream) {
        self.pairs.push((task, bars));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Spawns every task and waits for all of them.
    ///
    /// A task that panics is logged and left out of the returned reports;
    /// the other pairs' reports are still collected.
    pub async fn run(self) -> anyhow::Result<Vec<TaskReport<G>>> {
        tracing::info!("Initializing Portfolio Orchestrator Engine...");
        if self.pairs.is_empty() {
            anyhow::bail!("No trading tasks were started. Check the configured pairs.");
        }

        let mut symbols = Vec::with_capacity(self.pairs.len());
        let mut task_handles = Vec::with_capacity(self.pairs.len());
        for (mut task, bars) in self.pairs {
            tracing::info!(symbol = %task.symbol(), "Spawning trading task.");
            symbols.push(task.symbol().clone());
            let handle = tokio::spawn(async move {
                let result = task.run(bars).await;
                TaskReport { task, result }
            });
            task_handles.push(handle);
        }
        tracing::info!(count = task_handles.len(), "All trading tasks have been spawned.");

        let mut reports = Vec::with_capacity(task_handles.len());
        for (symbol, joined) in symbols.into_iter().zip(future::join_all(task_handles).await) {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!(%symbol, error = %e, "Trading task panicked or was cancelled."),
            }
        }
        Ok(reports)
    }
}

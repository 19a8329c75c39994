// In crates/execution/src/lib.rs

use async_trait::async_trait;
use core_types::{Position, Side};
pub mod error;
pub mod simulated;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use simulated::SimulatedExecutor;
pub use types::{Fill, OrderAck, SimulationSettings};

/// The order collaborator a strategy engine opens and closes positions through.
///
/// An `OrderGateway` may talk to a live venue or to a simulation. Calls are
/// awaited one at a time per engine; the gateway owns its own timeout and
/// retry policy.
#[async_trait]
pub trait OrderGateway: Send {
    /// The name of the gateway (e.g., "SimulatedExecutor").
    fn name(&self) -> &'static str;

    /// Opens a position on `side` at roughly `price`.
    ///
    /// The returned fill price becomes the position's entry price.
    async fn create_order(&mut self, side: Side, price: f64) -> Result<OrderAck>;

    /// Flattens `position` at roughly `price`.
    async fn close_order(&mut self, position: &Position, price: f64) -> Result<Fill>;
}

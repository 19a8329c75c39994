// In crates/execution/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("No open position found for order {order_id}")]
    NoOpenPosition { order_id: String },
}

pub type Result<T> = std::result::Result<T, Error>;

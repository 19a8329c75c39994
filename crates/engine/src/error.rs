// In crates/engine/src/error.rs

use core_types::Side;
use std::fmt;
use thiserror::Error;

/// Which order request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Open(Side),
    Close,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::Open(Side::Long) => f.write_str("open long"),
            OrderAction::Open(Side::Short) => f.write_str("open short"),
            OrderAction::Close => f.write_str("close"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad settings or a violated window precondition.
    #[error(transparent)]
    Strategy(#[from] strategies::Error),

    /// The order collaborator failed. Engine state is as it was before the
    /// request; the signal is dropped.
    #[error("Order request to {action} failed: {source}")]
    OrderRequestFailed {
        action: OrderAction,
        source: execution::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A period, percent or threshold that cannot be used. Raised at
    /// construction time, before any bar is processed.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A rolling window was read further back than it has been filled.
    #[error("Insufficient history: offset {offset} requested but only {len} value(s) recorded")]
    InsufficientHistory { offset: usize, len: usize },

    #[error("Unknown strategy preset: {0}")]
    UnknownStrategy(String),

    #[error("Failed to parse strategy params: {0}")]
    InvalidParams(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

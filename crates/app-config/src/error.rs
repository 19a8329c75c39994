// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid strategy for pair {symbol}: {source}")]
    Strategy {
        symbol: String,
        #[source]
        source: strategies::Error,
    },

    #[error("Pair {0} is configured more than once")]
    DuplicatePair(String),
}

pub type Result<T> = std::result::Result<T, Error>;

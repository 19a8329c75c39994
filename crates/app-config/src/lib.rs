// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, PairConfig, Settings};

/// Layered configuration loading:
/// 1. `base.toml` in `dir` (required).
/// 2. `<environment>.toml` in `dir`, if present.
/// 3. Environment variables, e.g. `APP__APP__LOG_LEVEL=debug`.
///
/// The result is validated before it is returned.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::from(dir.join("base")).required(true))
        .add_source(File::from(dir.join(environment)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

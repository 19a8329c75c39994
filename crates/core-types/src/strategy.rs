use serde::Deserialize;
use toml::Value;

/// A strategy selection as written in a pair's config block.
///
/// `name` picks a preset (or `custom`), `params` carries the
/// `params = { ... }` table from the TOML and is interpreted by the preset.
#[derive(Deserialize, Debug, Clone)]
pub struct StrategyConfig {
    pub name: String,
    #[serde(default = "default_params")]
    pub params: Value,
}

fn default_params() -> Value {
    Value::Table(Default::default())
}

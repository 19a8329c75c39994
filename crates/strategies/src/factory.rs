// In crates/strategies/src/factory.rs

use crate::types::{PresetOverrides, StrategySettings};
use crate::{Error, Result};
use core_types::StrategyConfig;

/// Preset names accepted in `StrategyConfig::name`, besides `custom`.
pub const PRESETS: [&str; 4] = [
    "ema_cross_ratchet",
    "price_follow_ema",
    "sma_trend_ratchet",
    "ema_spread_tiered",
];

/// Resolves a config block into validated strategy settings.
///
/// A preset takes optional `fast_period`/`slow_period` overrides from
/// `params`; `custom` reads the complete settings from `params`.
pub fn create_strategy_settings(config: &StrategyConfig) -> Result<StrategySettings> {
    let settings = match config.name.as_str() {
        "custom" => {
            let settings: StrategySettings = config.params.clone().try_into()?;
            settings
        }
        name => {
            let mut settings = match name {
                "ema_cross_ratchet" => StrategySettings::ema_cross_ratchet(),
                "price_follow_ema" => StrategySettings::price_follow_ema(),
                "sma_trend_ratchet" => StrategySettings::sma_trend_ratchet(),
                "ema_spread_tiered" => StrategySettings::ema_spread_tiered(),
                unknown => return Err(Error::UnknownStrategy(unknown.to_string())),
            };
            let overrides: PresetOverrides = config.params.clone().try_into()?;
            overrides.apply(&mut settings)?;
            settings
        }
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesSettings;
    use crate::stop_loss::StopLossSettings;

    fn config(src: &str) -> StrategyConfig {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn every_preset_resolves() {
        for name in PRESETS {
            let cfg = config(&format!("name = \"{name}\""));
            create_strategy_settings(&cfg).unwrap();
        }
    }

    #[test]
    fn preset_with_period_overrides() {
        let cfg = config(
            r#"
            name = "sma_trend_ratchet"
            params = { fast_period = 42, slow_period = 83 }
            "#,
        );
        let settings = create_strategy_settings(&cfg).unwrap();
        assert_eq!(settings.fast, SeriesSettings::sma(42));
        assert_eq!(settings.slow, SeriesSettings::sma(83));
    }

    #[test]
    fn unknown_param_key_is_a_parse_error() {
        let cfg = config(
            r#"
            name = "ema_cross_ratchet"
            params = { fast_periodd = 3 }
            "#,
        );
        assert!(matches!(create_strategy_settings(&cfg), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn overrides_are_validated() {
        let cfg = config(
            r#"
            name = "ema_cross_ratchet"
            params = { fast_period = 50 }
            "#,
        );
        assert!(matches!(
            create_strategy_settings(&cfg),
            Err(Error::InvalidParameter { name: "fast_period", .. })
        ));
    }

    #[test]
    fn huge_configured_period_is_an_invalid_parameter() {
        let cfg = config(
            r#"
            name = "sma_trend_ratchet"
            params = { slow_period = 4000000000 }
            "#,
        );
        assert!(matches!(
            create_strategy_settings(&cfg),
            Err(Error::InvalidParameter { name: "slow_period", .. })
        ));
    }

    #[test]
    fn custom_reads_full_settings() {
        let cfg = config(
            r#"
            name = "custom"

            [params.fast]
            kind = "ema"
            period = 5

            [params.slow]
            kind = "sma"
            period = 10

            [params.stop_loss]
            kind = "fixed_trailing"
            percent = 0.04
            reference = "fast"
            "#,
        );
        let settings = create_strategy_settings(&cfg).unwrap();
        assert_eq!(settings.fast, SeriesSettings::ema(5));
        assert_eq!(settings.slow, SeriesSettings::sma(10));
        assert!(matches!(settings.stop_loss, StopLossSettings::FixedTrailing { .. }));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let cfg = config(r#"name = "martingale""#);
        assert!(matches!(
            create_strategy_settings(&cfg),
            Err(Error::UnknownStrategy(name)) if name == "martingale"
        ));
    }
}

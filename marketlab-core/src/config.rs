//! Analysis configuration: every window, threshold and cooldown the pipeline uses.
//!
//! Stored as TOML with four optional sections. Any omitted key falls back to
//! its default, so an empty file is a valid configuration.
//!
//! ```toml
//! [indicators]
//! fast_ma = 20
//! slow_ma = 200
//!
//! [signals]
//! cooldown = 5
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub fast_ma: usize,
    pub slow_ma: usize,
    pub atr_period: usize,
    /// Window of the rolling high/low the premium/discount bands hang from.
    pub zone_lookback: usize,
    pub profile_lookback: usize,
    pub profile_bins: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            fast_ma: 20,
            slow_ma: 200,
            atr_period: 14,
            zone_lookback: 100,
            profile_lookback: 200,
            profile_bins: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub block_size: usize,
    pub block_threshold: f64,
    /// Bars on each side of a swing candidate.
    pub swing_radius: usize,
    pub consolidation_window: usize,
    pub consolidation_baseline: usize,
    pub volume_window: usize,
    pub high_volume_ratio: f64,
    pub absorption_max_range: f64,
    pub volatility_window: usize,
    pub regime_window: usize,
    pub periods_per_year: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            block_size: 10,
            block_threshold: 0.05,
            swing_radius: 2,
            consolidation_window: 20,
            consolidation_baseline: 100,
            volume_window: 20,
            high_volume_ratio: 1.5,
            absorption_max_range: 0.002,
            volatility_window: 20,
            regime_window: 100,
            periods_per_year: 252.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// |ma_diff| below this is a narrow market; above it is directional.
    pub ma_diff_threshold: f64,
    pub high_volume_percentile: f64,
    pub low_volume_percentile: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ma_diff_threshold: 0.01,
            high_volume_percentile: 0.8,
            low_volume_percentile: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// First bar position the generator scans.
    pub warmup: usize,
    pub cooldown: usize,
    pub trend_lookback: usize,
    pub trend_threshold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            warmup: 200,
            cooldown: 5,
            trend_lookback: 5,
            trend_threshold: 0.0005,
        }
    }
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub detectors: DetectorConfig,
    pub classifier: ClassifierConfig,
    pub signals: SignalConfig,
}

impl AnalysisConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Fewest bars the indicator engine and classifier accept.
    pub fn min_bars(&self) -> usize {
        self.indicators
            .slow_ma
            .max(self.indicators.profile_lookback)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        let det = &self.detectors;
        let windows = [
            ("indicators.fast_ma", ind.fast_ma),
            ("indicators.slow_ma", ind.slow_ma),
            ("indicators.atr_period", ind.atr_period),
            ("indicators.zone_lookback", ind.zone_lookback),
            ("indicators.profile_lookback", ind.profile_lookback),
            ("indicators.profile_bins", ind.profile_bins),
            ("detectors.block_size", det.block_size),
            ("detectors.consolidation_window", det.consolidation_window),
            ("detectors.consolidation_baseline", det.consolidation_baseline),
            ("detectors.volume_window", det.volume_window),
            ("detectors.volatility_window", det.volatility_window),
            ("detectors.regime_window", det.regime_window),
            ("signals.trend_lookback", self.signals.trend_lookback),
        ];
        for (field, value) in windows {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be >= 1".into(),
                });
            }
        }

        if ind.fast_ma >= ind.slow_ma {
            return Err(ConfigError::Invalid {
                field: "indicators.fast_ma",
                reason: format!("must be below slow_ma ({})", ind.slow_ma),
            });
        }

        let positives = [
            ("detectors.block_threshold", det.block_threshold),
            ("detectors.high_volume_ratio", det.high_volume_ratio),
            ("detectors.absorption_max_range", det.absorption_max_range),
            ("detectors.periods_per_year", det.periods_per_year),
            ("classifier.ma_diff_threshold", self.classifier.ma_diff_threshold),
            ("signals.trend_threshold", self.signals.trend_threshold),
        ];
        for (field, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        let cls = &self.classifier;
        if !(0.0..=1.0).contains(&cls.low_volume_percentile)
            || !(0.0..=1.0).contains(&cls.high_volume_percentile)
            || cls.low_volume_percentile > cls.high_volume_percentile
        {
            return Err(ConfigError::Invalid {
                field: "classifier.high_volume_percentile",
                reason: "percentiles must satisfy 0 <= low <= high <= 1".into(),
            });
        }

        // ma_trend reads ma20 `trend_lookback` bars back and the previous close.
        if self.signals.warmup < self.signals.trend_lookback.max(2) {
            return Err(ConfigError::Invalid {
                field: "signals.warmup",
                reason: format!(
                    "must be at least {} bars",
                    self.signals.trend_lookback.max(2)
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.indicators.fast_ma, 20);
        assert_eq!(config.indicators.slow_ma, 200);
        assert_eq!(config.indicators.atr_period, 14);
        assert_eq!(config.indicators.profile_bins, 25);
        assert_eq!(config.detectors.block_size, 10);
        assert_eq!(config.signals.cooldown, 5);
        assert_eq!(config.min_bars(), 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn partial_section_overrides_only_named_keys() {
        let config = AnalysisConfig::from_toml(
            r#"
            [signals]
            cooldown = 8

            [classifier]
            ma_diff_threshold = 0.02
            "#,
        )
        .unwrap();
        assert_eq!(config.signals.cooldown, 8);
        assert_eq!(config.signals.warmup, 200);
        assert_eq!(config.classifier.ma_diff_threshold, 0.02);
        assert_eq!(config.indicators, IndicatorConfig::default());
    }

    #[test]
    fn rejects_zero_window() {
        let err = AnalysisConfig::from_toml("[indicators]\nprofile_bins = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "indicators.profile_bins",
                ..
            }
        ));
    }

    #[test]
    fn rejects_fast_ma_not_below_slow_ma() {
        let err =
            AnalysisConfig::from_toml("[indicators]\nfast_ma = 50\nslow_ma = 50\n").unwrap_err();
        assert!(err.to_string().contains("indicators.fast_ma"));
    }

    #[test]
    fn rejects_inverted_percentiles() {
        let err = AnalysisConfig::from_toml(
            "[classifier]\nhigh_volume_percentile = 0.1\nlow_volume_percentile = 0.9\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = AnalysisConfig::from_toml("[signals\ncooldown = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = AnalysisConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(AnalysisConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn min_bars_follows_longest_window() {
        let mut config = AnalysisConfig::default();
        config.indicators.profile_lookback = 250;
        assert_eq!(config.min_bars(), 250);
    }
}

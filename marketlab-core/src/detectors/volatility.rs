//! Volatility estimators and regime.
//!
//! - historical: sample std of close-to-close returns, annualized by `sqrt(periods_per_year)`
//! - Parkinson: `sqrt(mean(ln(high/low)^2) * periods_per_year / (4 ln 2))`
//! - regime: percentile rank of the current historical volatility among the
//!   trailing `regime_window` values (current included), bucketed at 25/75
//! - breakout: historical volatility strictly above its own trailing
//!   `regime_window` maximum, current bar included. Equality at the maximum
//!   never counts, so the extreme bar itself is never flagged.

use crate::domain::Bar;
use crate::indicators::rolling::{returns, rolling_max, rolling_mean, rolling_std};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityRegime {
    Low,
    Normal,
    High,
}

impl VolatilityRegime {
    /// Bucket a percentile rank in `(0, 1]`.
    pub fn from_rank(rank: f64) -> Self {
        if rank <= 0.25 {
            Self::Low
        } else if rank > 0.75 {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LowVol",
            Self::Normal => "NormalVol",
            Self::High => "HighVol",
        }
    }
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    pub historical: Vec<f64>,
    pub parkinson: Vec<f64>,
    /// `None` until the regime window is full of defined values.
    pub regime: Vec<Option<VolatilityRegime>>,
    pub breakout: Vec<bool>,
}

pub fn analyze_volatility(
    bars: &[Bar],
    window: usize,
    regime_window: usize,
    periods_per_year: f64,
) -> Volatility {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let historical: Vec<f64> = rolling_std(&returns(&closes), window)
        .into_iter()
        .map(|s| s * periods_per_year.sqrt())
        .collect();

    let log_range_sq: Vec<f64> = bars.iter().map(|b| (b.high / b.low).ln().powi(2)).collect();
    let parkinson = rolling_mean(&log_range_sq, window)
        .into_iter()
        .map(|m| (m * periods_per_year / (4.0 * std::f64::consts::LN_2)).sqrt())
        .collect();

    Volatility {
        regime: classify_regimes(&historical, regime_window),
        breakout: detect_breakouts(&historical, regime_window),
        historical,
        parkinson,
    }
}

/// Fraction of `window` at or below `value`, ties averaged.
///
/// `(count_below + (count_equal + 1) / 2) / len`, with `value` itself
/// counted among the equal entries.
pub fn percentile_rank(window: &[f64], value: f64) -> f64 {
    let below = window.iter().filter(|&&v| v < value).count() as f64;
    let equal = window.iter().filter(|&&v| v == value).count() as f64;
    (below + (equal + 1.0) / 2.0) / window.len() as f64
}

pub fn classify_regimes(historical: &[f64], window: usize) -> Vec<Option<VolatilityRegime>> {
    let mut out = vec![None; historical.len()];
    if window == 0 {
        return out;
    }
    for i in window.saturating_sub(1)..historical.len() {
        let w = &historical[i + 1 - window..=i];
        if w.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = Some(VolatilityRegime::from_rank(percentile_rank(w, historical[i])));
    }
    out
}

pub fn detect_breakouts(historical: &[f64], window: usize) -> Vec<bool> {
    rolling_max(historical, window)
        .iter()
        .zip(historical)
        .map(|(&max, &hv)| hv > max)
        .collect()
}

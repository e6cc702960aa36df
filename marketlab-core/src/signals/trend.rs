//! Moving-average trend check used to validate every signal.
//!
//! `slope = (ma[i] - ma[i - lookback]) / ma[i - lookback]`. Above `threshold`
//! the trend is up, below `-threshold` down, otherwise (or when undefined)
//! neutral. Price is aligned with the trend when both the current and the
//! previous close sit on the trend's side of the average.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub direction: TrendDirection,
    /// `min(|slope| * 1000, 1)`; zero when the slope is undefined.
    pub strength: f64,
    pub price_alignment: bool,
}

impl TrendReading {
    fn neutral() -> Self {
        Self {
            direction: TrendDirection::Neutral,
            strength: 0.0,
            price_alignment: false,
        }
    }
}

pub fn ma_trend(
    closes: &[f64],
    ma: &[f64],
    i: usize,
    lookback: usize,
    threshold: f64,
) -> TrendReading {
    if i < lookback.max(1) || i >= closes.len() || i >= ma.len() {
        return TrendReading::neutral();
    }
    let base = ma[i - lookback];
    let slope = (ma[i] - base) / base;
    if !slope.is_finite() {
        return TrendReading::neutral();
    }

    let strength = (slope.abs() * 1000.0).min(1.0);
    let (direction, price_alignment) = if slope > threshold {
        let aligned = closes[i] > ma[i] && closes[i - 1] > ma[i - 1];
        (TrendDirection::Up, aligned)
    } else if slope < -threshold {
        let aligned = closes[i] < ma[i] && closes[i - 1] < ma[i - 1];
        (TrendDirection::Down, aligned)
    } else {
        (TrendDirection::Neutral, false)
    };

    TrendReading {
        direction,
        strength,
        price_alignment,
    }
}

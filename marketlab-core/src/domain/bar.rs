//! Bar, the fundamental market data unit, and the owned series of bars.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV bar for one fixed time interval of a single instrument.
///
/// The OHLC ordering invariant (`high >= max(open, close) >= min(open, close) >= low`)
/// is not enforced anywhere in the pipeline; inconsistent bars propagate as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Basic OHLC sanity check: high >= low, high >= open/close, low <= open/close.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }

    /// Bar height (high - low).
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Absolute size of the real body.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Ordered, exclusively-owned sequence of bars.
///
/// Timestamps are expected to be strictly increasing (the resampler guarantees
/// this for its output). Lookup by timestamp relies on that ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Position of the bar with exactly this timestamp.
    pub fn position_of(&self, timestamp: NaiveDateTime) -> Option<usize> {
        self.bars
            .binary_search_by(|bar| bar.timestamp.cmp(&timestamp))
            .ok()
    }

    /// Returns true if timestamps are strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.bars
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp)
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

impl From<Vec<Bar>> for BarSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}

impl AsRef<[Bar]> for BarSeries {
    fn as_ref(&self) -> &[Bar] {
        &self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_bar() -> Bar {
        Bar {
            timestamp: ts(9),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn wicks_and_body() {
        let bar = sample_bar();
        assert_eq!(bar.body(), 3.0);
        assert_eq!(bar.upper_wick(), 2.0);
        assert_eq!(bar.lower_wick(), 2.0);
        assert_eq!(bar.range(), 7.0);
        assert!(bar.is_bullish());
    }

    #[test]
    fn series_lookup_by_timestamp() {
        let bars: Vec<Bar> = (9..14)
            .map(|h| Bar {
                timestamp: ts(h),
                ..sample_bar()
            })
            .collect();
        let series = BarSeries::new(bars);
        assert_eq!(series.position_of(ts(11)), Some(2));
        assert_eq!(series.position_of(ts(20)), None);
        assert!(series.is_strictly_increasing());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}

//! Resampling fine-grained bars into fixed-interval OHLCV bars.
//!
//! Buckets are formed by truncating each timestamp to a multiple of the
//! interval counted from the Unix epoch. Aggregation: open=first, high=max,
//! low=min, close=last, volume=sum. Buckets without input bars are dropped,
//! never forward- or zero-filled.
//!
//! Caller contract: input is sorted ascending. Bucket membership does not
//! depend on order, but "first"/"last" do; unsorted input yields undefined
//! open/close values and is not checked at runtime.

use crate::domain::{Bar, BarSeries};
use crate::error::DataError;
use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A fixed resampling interval, stored in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    seconds: i64,
}

impl Interval {
    /// Longest accepted interval: one hundred 366-day years.
    pub const MAX_SECONDS: i64 = 100 * 366 * 86_400;

    /// `None` unless `0 < seconds <= MAX_SECONDS`.
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        (seconds > 0 && seconds <= Self::MAX_SECONDS).then_some(Self { seconds })
    }

    /// `n` minutes, clamped to `1..=MAX_SECONDS` seconds.
    pub fn minutes(n: i64) -> Self {
        Self::clamped(n, 60)
    }

    pub fn hours(n: i64) -> Self {
        Self::clamped(n, 3600)
    }

    pub fn days(n: i64) -> Self {
        Self::clamped(n, 86_400)
    }

    fn clamped(n: i64, unit_seconds: i64) -> Self {
        Self {
            seconds: n.saturating_mul(unit_seconds).clamp(1, Self::MAX_SECONDS),
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.seconds)
    }

    /// Start of the bucket containing `ts`.
    pub fn truncate(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let secs = ts.and_utc().timestamp();
        let start = secs.div_euclid(self.seconds) * self.seconds;
        DateTime::from_timestamp(start, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or(ts)
    }
}

impl FromStr for Interval {
    type Err = DataError;

    /// Accepts `"1 hour"`, `"15 minutes"`, `"15min"`, `"15m"`, `"4h"`, `"1d"`, `"30s"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataError::InvalidInterval(s.to_string());
        let trimmed = s.trim().to_ascii_lowercase();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (count, unit) = trimmed.split_at(split);
        let count: i64 = count.parse().map_err(|_| invalid())?;
        let unit_seconds = match unit.trim() {
            "s" | "sec" | "secs" | "second" | "seconds" => 1,
            "m" | "min" | "mins" | "minute" | "minutes" => 60,
            "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
            "d" | "day" | "days" => 86_400,
            "w" | "week" | "weeks" => 7 * 86_400,
            _ => return Err(invalid()),
        };
        count
            .checked_mul(unit_seconds)
            .and_then(Self::from_seconds)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s % 86_400 == 0 {
            write!(f, "{}d", s / 86_400)
        } else if s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s % 60 == 0 {
            write!(f, "{}m", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}

/// Resample `bars` to `interval`.
pub fn resample(bars: &[Bar], interval: Interval) -> BarSeries {
    let mut buckets: BTreeMap<NaiveDateTime, Bar> = BTreeMap::new();

    for bar in bars {
        let key = interval.truncate(bar.timestamp);
        buckets
            .entry(key)
            .and_modify(|agg| {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume += bar.volume;
            })
            .or_insert(Bar {
                timestamp: key,
                ..*bar
            });
    }

    BarSeries::new(buckets.into_values().collect())
}

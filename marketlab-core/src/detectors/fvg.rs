//! Fair value gaps: three-bar imbalances.
//!
//! Bullish at `i`: `low[i] > high[i-2]` and bar `i-1` closed up.
//! Bearish at `i`: `high[i] < low[i-2]` and bar `i-1` closed down.

use crate::domain::Bar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FairValueGaps {
    pub bullish: Vec<bool>,
    pub bearish: Vec<bool>,
}

pub fn detect_fair_value_gaps(bars: &[Bar]) -> FairValueGaps {
    let n = bars.len();
    let mut gaps = FairValueGaps {
        bullish: vec![false; n],
        bearish: vec![false; n],
    };

    for i in 2..n {
        let (two_back, prev, cur) = (&bars[i - 2], &bars[i - 1], &bars[i]);
        gaps.bullish[i] = cur.low > two_back.high && prev.is_bullish();
        gaps.bearish[i] = cur.high < two_back.low && prev.is_bearish();
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlcv;

    #[test]
    fn bullish_gap_needs_up_middle_bar() {
        let bars = make_ohlcv(&[
            (100.0, 101.0, 99.0, 100.5, 1.0),
            (100.5, 104.0, 100.0, 103.5, 1.0), // up bar
            (103.5, 106.0, 102.0, 105.0, 1.0), // low 102 > high 101
        ]);
        let gaps = detect_fair_value_gaps(&bars);
        assert_eq!(gaps.bullish, vec![false, false, true]);
        assert_eq!(gaps.bearish, vec![false, false, false]);
    }

    #[test]
    fn no_bullish_gap_after_down_middle_bar() {
        let bars = make_ohlcv(&[
            (100.0, 101.0, 99.0, 100.5, 1.0),
            (104.0, 104.5, 100.0, 101.0, 1.0), // down bar
            (103.5, 106.0, 102.0, 105.0, 1.0),
        ]);
        assert!(!detect_fair_value_gaps(&bars).bullish[2]);
    }

    #[test]
    fn bearish_gap_mirror() {
        let bars = make_ohlcv(&[
            (100.0, 101.0, 99.0, 99.5, 1.0),
            (99.5, 100.0, 95.0, 95.5, 1.0), // down bar
            (95.5, 97.0, 94.0, 94.5, 1.0),  // high 97 < low 99
        ]);
        let gaps = detect_fair_value_gaps(&bars);
        assert!(gaps.bearish[2]);
        assert!(!gaps.bullish[2]);
    }

    #[test]
    fn short_series_has_no_gaps() {
        let bars = make_ohlcv(&[(1.0, 2.0, 0.5, 1.5, 1.0); 2]);
        let gaps = detect_fair_value_gaps(&bars);
        assert_eq!(gaps.bullish, vec![false, false]);
    }
}

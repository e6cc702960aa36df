//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. ATR is never negative where defined
//! 2. Moving averages stay inside their window's close range
//! 3. Signals alternate direction and respect the cooldown
//! 4. Classification is total for series long enough to classify
//! 5. Volume profile buckets account for all window volume
//! 6. Resampling an already-resampled series changes nothing

use chrono::{NaiveDate, NaiveDateTime};
use marketlab_core::config::IndicatorConfig;
use marketlab_core::data::{resample, Interval, RandomWalk};
use marketlab_core::indicators::{volume_profile, Atr, Indicator, IndicatorSet, Sma};
use marketlab_core::signals::SignalGenerator;
use marketlab_core::{Analyzer, Bar, BarSeries, MarketState};
use proptest::prelude::*;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ── Strategies (proptest) ────────────────────────────────────────────

/// Sane bars built from (return, upper wick, lower wick, volume) draws.
fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(
        (-0.03..0.03_f64, 0.0..0.01_f64, 0.0..0.01_f64, 1.0..10_000.0_f64),
        min..max,
    )
    .prop_map(|draws| {
        let mut price = 100.0;
        draws
            .into_iter()
            .enumerate()
            .map(|(i, (ret, up, down, volume))| {
                let open = price;
                let close = price * (1.0 + ret);
                price = close;
                Bar {
                    timestamp: start() + chrono::Duration::minutes(5 * i as i64),
                    open,
                    high: open.max(close) * (1.0 + up),
                    low: open.min(close) * (1.0 - down),
                    close,
                    volume: volume.round(),
                }
            })
            .collect()
    })
}

fn arb_state() -> impl Strategy<Value = MarketState> {
    prop::sample::select(MarketState::BASE.to_vec())
}

// ── 1-2. Indicator bounds ────────────────────────────────────────────

proptest! {
    #[test]
    fn atr_is_non_negative(bars in arb_bars(20, 200), period in 1usize..30) {
        for v in Atr::new(period).compute(&bars) {
            prop_assert!(v.is_nan() || v >= 0.0);
        }
    }

    #[test]
    fn moving_average_within_window_range(bars in arb_bars(30, 200), period in 1usize..30) {
        let ma = Sma::new(period).compute(&bars);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        for i in (period - 1)..bars.len() {
            let window = &closes[i + 1 - period..=i];
            let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(ma[i] >= lo - 1e-9 && ma[i] <= hi + 1e-9);
        }
    }
}

// ── 3-4. Signals and classification ──────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn signals_alternate_and_respect_cooldown(seed in any::<u64>(), state in arb_state()) {
        let bars = RandomWalk::new(start(), Interval::hours(1), seed).generate(400);
        let ind = IndicatorSet::compute(&bars, &IndicatorConfig::default()).unwrap();
        let signals = SignalGenerator::default().generate(&bars, &ind, state);
        for pair in signals.windows(2) {
            prop_assert_ne!(pair[0].direction, pair[1].direction);
            prop_assert!(pair[1].bar_index - pair[0].bar_index > 5);
        }
    }

    #[test]
    fn classification_is_total(bars in arb_bars(200, 320)) {
        let report = Analyzer::default().analyze(&BarSeries::new(bars)).unwrap();
        prop_assert!(MarketState::BASE.contains(&report.market_state));
        prop_assert!(report.levels.is_some());
    }

    #[test]
    fn short_series_is_insufficient(bars in arb_bars(0, 200)) {
        let report = Analyzer::default().analyze(&BarSeries::new(bars)).unwrap();
        prop_assert_eq!(report.market_state, MarketState::InsufficientData);
        prop_assert!(report.signals.is_empty());
    }
}

// ── 5-6. Profile and resampling ──────────────────────────────────────

proptest! {
    #[test]
    fn profile_sums_to_window_volume(
        bars in arb_bars(50, 300),
        lookback in 1usize..50,
        bins in 1usize..40,
    ) {
        let profile = volume_profile(&bars, lookback, bins).unwrap();
        let expected: f64 = bars[bars.len() - lookback..].iter().map(|b| b.volume).sum();
        prop_assert_eq!(profile.volumes.len(), bins);
        prop_assert!((profile.total_volume() - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn resampling_is_idempotent(bars in arb_bars(1, 300), minutes in 1i64..240) {
        let interval = Interval::minutes(minutes);
        let once = resample(&bars, interval);
        let twice = resample(once.bars(), interval);
        prop_assert_eq!(once, twice);
    }
}

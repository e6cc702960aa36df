//! Synthetic bar generation for demos, benchmarks and tests.
//!
//! Produces a seeded random walk; the same seed always yields the same bars.
//! Synthetic data is clearly fake and must never be mistaken for market data.

use crate::data::resample::Interval;
use crate::domain::Bar;
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters for a synthetic random walk.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    pub start: NaiveDateTime,
    pub interval: Interval,
    pub start_price: f64,
    /// Maximum absolute per-bar return.
    pub max_return: f64,
    /// Maximum wick extension beyond the body, as a fraction of price.
    pub max_wick: f64,
    pub seed: u64,
}

impl RandomWalk {
    pub fn new(start: NaiveDateTime, interval: Interval, seed: u64) -> Self {
        Self {
            start,
            interval,
            start_price: 100.0,
            max_return: 0.01,
            max_wick: 0.004,
            seed,
        }
    }

    /// Up to `n` bars; stops early if the next timestamp would leave chrono's
    /// calendar range.
    pub fn generate(&self, n: usize) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let step = self.interval.as_duration();
        let mut bars = Vec::with_capacity(n);
        let mut price = self.start_price;
        let mut ts = self.start;

        for _ in 0..n {
            let ret: f64 = rng.gen_range(-self.max_return..=self.max_return);
            let open = price;
            let close = price * (1.0 + ret);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..=self.max_wick));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..=self.max_wick));
            let volume = rng.gen_range(500.0..5_000.0_f64).round();

            bars.push(Bar {
                timestamp: ts,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            ts = match ts.checked_add_signed(step) {
                Some(next) => next,
                None => break,
            };
        }

        bars
    }
}

//! Sequential signal scan with cooldown and direction de-duplication.
//!
//! The scan walks positions `warmup..len` once, carrying only
//! `GeneratorState`. At each position:
//!
//! 1. while cooling down, decrement and skip
//! 2. read the fast-average trend; neutral or misaligned price means no signal
//! 3. pick the rule for the whole-run market state
//! 4. emit only if the direction differs from the last emitted one, then
//!    start a fresh cooldown
//!
//! The market state is the single value classified from the final bar and is
//! applied unchanged at every historical position.

use super::trend::{ma_trend, TrendDirection, TrendReading};
use super::{Signal, SignalDirection, StrategyLabel};
use crate::classify::MarketState;
use crate::config::SignalConfig;
use crate::domain::Bar;
use crate::indicators::IndicatorSet;
use tracing::trace;

/// Mutable cursor of one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorState {
    pub last_direction: Option<SignalDirection>,
    pub cooldown: usize,
}

impl GeneratorState {
    /// Consume one bar of cooldown. Returns `true` if the bar may be evaluated.
    pub fn ready(&mut self) -> bool {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            false
        } else {
            true
        }
    }

    /// Offer a produced direction. Returns `true` if it is emitted.
    pub fn offer(&mut self, direction: SignalDirection, cooldown: usize) -> bool {
        if self.last_direction == Some(direction) {
            return false;
        }
        self.last_direction = Some(direction);
        self.cooldown = cooldown;
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Scan `bars` and return the emitted signals in bar order.
    pub fn generate(
        &self,
        bars: &[Bar],
        indicators: &IndicatorSet,
        state: MarketState,
    ) -> Vec<Signal> {
        if state == MarketState::InsufficientData {
            return Vec::new();
        }
        let n = bars.len().min(indicators.len());
        let closes: Vec<f64> = bars[..n].iter().map(|b| b.close).collect();
        let ma = &indicators.ma_fast;

        let mut cursor = GeneratorState::default();
        let mut signals = Vec::new();

        for i in self.config.warmup.max(2)..n {
            if !cursor.ready() {
                continue;
            }
            let trend = ma_trend(
                &closes,
                ma,
                i,
                self.config.trend_lookback,
                self.config.trend_threshold,
            );
            if trend.direction == TrendDirection::Neutral || !trend.price_alignment {
                continue;
            }
            let Some(strategy) = select_rule(state, &trend, bars, ma, i) else {
                continue;
            };
            let direction = strategy.direction();
            if !cursor.offer(direction, self.config.cooldown) {
                trace!(bar = i, %strategy, "suppressed repeat direction");
                continue;
            }
            signals.push(Signal {
                timestamp: bars[i].timestamp,
                bar_index: i,
                direction,
                strategy,
                entry_price: bars[i].close,
                strength: trend.strength,
                market_state: state,
            });
        }

        signals
    }
}

/// Strategy rule for `state` at bar `i`, given an aligned, non-neutral trend.
fn select_rule(
    state: MarketState,
    trend: &TrendReading,
    bars: &[Bar],
    ma: &[f64],
    i: usize,
) -> Option<StrategyLabel> {
    let up = trend.direction == TrendDirection::Up;
    let down = trend.direction == TrendDirection::Down;
    let bar = &bars[i];
    let prev = &bars[i - 1];

    match state {
        MarketState::Premium if down => Some(StrategyLabel::SellInPremiumZone),
        MarketState::Discount if up => Some(StrategyLabel::BuyInDiscountZone),
        s if s.is_narrow() => {
            if up && bar.close > prev.high {
                Some(StrategyLabel::BreakoutBuy)
            } else if down && bar.close < prev.low {
                Some(StrategyLabel::BreakoutSell)
            } else {
                None
            }
        }
        MarketState::TrendingUp if up && bar.low > ma[i] => Some(StrategyLabel::BuyTheDip),
        MarketState::TrendingDown if down && bar.high < ma[i] => {
            Some(StrategyLabel::SellTheRally)
        }
        MarketState::WideBullish if up && bar.low > ma[i - 2] => {
            Some(StrategyLabel::BuyTheDipInWideMarket)
        }
        MarketState::WideBearish if down && bar.high < ma[i - 2] => {
            Some(StrategyLabel::SellTheRallyInWideMarket)
        }
        _ => None,
    }
}

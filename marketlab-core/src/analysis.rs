//! Analysis pipeline: indicators, detectors, classifier and signal scan over
//! one immutable series.
//!
//! Every call owns its intermediate results; an `Analyzer` holds only its
//! configuration and can be shared across threads.

use crate::classify::{classify, classify_enhanced, EnhancedState, LevelSnapshot, MarketState};
use crate::config::AnalysisConfig;
use crate::data::{resample, Interval};
use crate::detectors::{detect_all, BarFlags, DetectorFlags};
use crate::domain::{Bar, BarSeries, DatasetHash};
use crate::error::{AnalysisError, ConfigError};
use crate::indicators::IndicatorSet;
use crate::signals::{Signal, SignalGenerator};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything one analysis produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub market_state: MarketState,
    pub enhanced_state: EnhancedState,
    pub levels: Option<LevelSnapshot>,
    pub signals: Vec<Signal>,
    /// Detector flags of the final bar.
    pub last_flags: Option<BarFlags>,
    pub indicators: Option<IndicatorSet>,
    pub flags: Option<DetectorFlags>,
    pub bar_count: usize,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub dataset_hash: DatasetHash,
    /// Resampling interval, when the analysis resampled its input.
    pub interval: Option<Interval>,
}

impl AnalysisReport {
    fn insufficient(series: &BarSeries, hash: DatasetHash) -> Self {
        Self {
            market_state: MarketState::InsufficientData,
            enhanced_state: EnhancedState::plain(MarketState::InsufficientData),
            levels: None,
            signals: Vec::new(),
            last_flags: None,
            indicators: None,
            flags: None,
            bar_count: series.len(),
            first_timestamp: series.first().map(|b| b.timestamp),
            last_timestamp: series.last().map(|b| b.timestamp),
            dataset_hash: hash,
            interval: None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.market_state == MarketState::InsufficientData
    }

    /// Drop the full indicator and flag series, keeping the point-in-time view.
    pub fn without_series(mut self) -> Self {
        self.indicators = None;
        self.flags = None;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Validate `config` and build an analyzer around it.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse an already-resampled series.
    ///
    /// A series shorter than `config.min_bars()` is reported as
    /// `InsufficientData` with no indicators, flags or signals.
    pub fn analyze(&self, series: &BarSeries) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();
        let bars = series.bars();
        let hash = DatasetHash::of_bars(bars);
        let required = self.config.min_bars();

        if bars.len() < required {
            warn!(
                bars = bars.len(),
                required,
                dataset = hash.short(),
                "not enough bars to classify"
            );
            return Ok(AnalysisReport::insufficient(series, hash));
        }

        let indicators = IndicatorSet::compute(bars, &self.config.indicators)?;
        debug!(bars = bars.len(), "indicators computed");

        let flags = detect_all(bars, &self.config.detectors);
        debug!("detectors finished");

        let classification = classify(bars, &indicators, &flags, &self.config);
        let enhanced_state = classify_enhanced(&classification, &flags);
        debug!(state = %classification.state, enhanced = %enhanced_state, "classified");

        let signals = SignalGenerator::new(self.config.signals.clone()).generate(
            bars,
            &indicators,
            classification.state,
        );

        info!(
            dataset = hash.short(),
            bars = bars.len(),
            state = %classification.state,
            signals = signals.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(AnalysisReport {
            market_state: classification.state,
            enhanced_state,
            levels: classification.levels,
            signals,
            last_flags: flags.last(),
            indicators: Some(indicators),
            flags: Some(flags),
            bar_count: bars.len(),
            first_timestamp: series.first().map(|b| b.timestamp),
            last_timestamp: series.last().map(|b| b.timestamp),
            dataset_hash: hash,
            interval: None,
        })
    }

    /// Resample raw bars to `interval`, then analyse.
    pub fn analyze_raw(
        &self,
        bars: &[Bar],
        interval: Interval,
    ) -> Result<AnalysisReport, AnalysisError> {
        let series = resample(bars, interval);
        debug!(raw = bars.len(), resampled = series.len(), %interval, "resampled");
        let mut report = self.analyze(&series)?;
        report.interval = Some(interval);
        Ok(report)
    }
}

//! MarketLab Core: bars, resampling, indicators, pattern detectors, market
//! state classification and signal generation.
//!
//! This crate holds the whole analysis pipeline:
//! - Domain types (bars, bar series, dataset hash)
//! - Resampling, CSV ingest and seeded synthetic bars
//! - Indicator engine (moving averages, ATR, premium/discount bands, volume profile)
//! - Pattern detectors (FVG, order blocks, swings, consolidation, order flow, VPA, volatility)
//! - Market state classifier and the sequential signal generator
//! - `Analyzer`, which runs all of the above over one series

pub mod analysis;
pub mod classify;
pub mod config;
pub mod data;
pub mod detectors;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod signals;

pub use analysis::{AnalysisReport, Analyzer};
pub use classify::{Classification, EnhancedState, LevelSnapshot, MarketState};
pub use config::AnalysisConfig;
pub use domain::{Bar, BarSeries, DatasetHash};
pub use error::{AnalysisError, ConfigError, DataError};
pub use signals::{Signal, SignalDirection, StrategyLabel};

//! Domain types for MarketLab

pub mod bar;
pub mod ids;

pub use bar::{Bar, BarSeries};
pub use ids::DatasetHash;

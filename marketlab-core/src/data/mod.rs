//! Data ingestion, resampling and synthetic generation

pub mod ingest;
pub mod resample;
pub mod synthetic;

pub use ingest::{parse_timestamp, read_csv, read_csv_file, write_csv};
pub use resample::{resample, Interval};
pub use synthetic::RandomWalk;

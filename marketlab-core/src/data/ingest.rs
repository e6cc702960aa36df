//! CSV ingestion and export of OHLCV bars.
//!
//! Expected header: `timestamp,open,high,low,close,volume` (extra columns are
//! ignored). Timestamps may be `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
//! RFC 3339, a bare `YYYY-MM-DD`, or integer epoch seconds.

use crate::domain::Bar;
use crate::error::DataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse one timestamp cell in any of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Read bars from any CSV source.
///
/// Rows are returned in file order; sorting and de-duplication are the data
/// supplier's responsibility.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRecord>().enumerate() {
        let row = i + 1;
        let rec = record?;
        let timestamp = parse_timestamp(&rec.timestamp).ok_or_else(|| DataError::Timestamp {
            row,
            value: rec.timestamp.clone(),
        })?;
        let fields = [
            ("open", rec.open),
            ("high", rec.high),
            ("low", rec.low),
            ("close", rec.close),
            ("volume", rec.volume),
        ];
        if let Some(&(column, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DataError::NonFinite { row, column });
        }
        bars.push(Bar {
            timestamp,
            open: rec.open,
            high: rec.high,
            low: rec.low,
            close: rec.close,
            volume: rec.volume,
        });
    }

    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(bars)
}

/// Read bars from a CSV file on disk.
pub fn read_csv_file(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path)?;
    read_csv(std::io::BufReader::new(file))
}

/// Write bars as CSV with the canonical header.
pub fn write_csv<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        wtr.write_record([
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

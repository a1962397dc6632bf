//! CSV tick source.

use chrono::{DateTime, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use signal_core::{DataError, Tick};
use std::path::{Path, PathBuf};
use tracing::warn;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Symbol", alias = "symbol")]
    symbol: String,
    #[serde(alias = "Price", alias = "price", alias = "last_price")]
    price: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
    #[serde(alias = "Timestamp", alias = "timestamp", alias = "time")]
    timestamp: String,
}

/// Result of loading a tick file: validated ticks in timestamp order,
/// plus the count of records rejected at the ingestion boundary.
#[derive(Debug)]
pub struct TickBatch {
    pub ticks: Vec<Tick>,
    pub rejected: usize,
}

/// Tick source reading recorded feed data from a CSV file.
pub struct CsvTickSource {
    path: PathBuf,
}

impl CsvTickSource {
    /// Create a new CSV tick source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load all ticks from the file.
    ///
    /// Malformed records (bad timestamp, non-positive price, negative
    /// volume) are rejected individually and counted, never partially
    /// ingested; a structurally broken file is a hard error.
    pub fn load_all(&self) -> Result<TickBatch, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut ticks = Vec::new();
        let mut rejected = 0;

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

            let tick = parse_timestamp(&record.timestamp).and_then(|ts| {
                Tick::new(record.symbol.as_str(), record.price, record.volume, ts)
            });

            match tick {
                Ok(tick) => ticks.push(tick),
                Err(e) => {
                    warn!(error = %e, "rejected tick record");
                    rejected += 1;
                }
            }
        }

        ticks.sort_by_key(|t| t.timestamp);

        Ok(TickBatch { ticks, rejected })
    }
}

/// Parse a timestamp as Unix seconds/milliseconds, RFC 3339, or a
/// plain datetime string.
fn parse_timestamp(value: &str) -> Result<i64, DataError> {
    if let Ok(ts) = value.parse::<i64>() {
        // Assume milliseconds if more than 10 digits
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc().timestamp_millis());
    }

    Err(DataError::ParseError(format!(
        "Could not parse timestamp: {}",
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_well_formed_file() {
        let file = write_csv(
            "symbol,price,volume,timestamp\n\
             BTCUSDT,42000.5,1.2,1700000060000\n\
             BTCUSDT,42010.0,0.8,1700000000000\n",
        );

        let batch = CsvTickSource::new(file.path()).unwrap().load_all().unwrap();
        assert_eq!(batch.ticks.len(), 2);
        assert_eq!(batch.rejected, 0);
        // Sorted by timestamp regardless of file order
        assert!(batch.ticks[0].timestamp < batch.ticks[1].timestamp);
    }

    #[test]
    fn test_malformed_records_are_rejected_not_fatal() {
        let file = write_csv(
            "symbol,price,volume,timestamp\n\
             BTCUSDT,42000.5,1.2,1700000000000\n\
             BTCUSDT,-5.0,1.0,1700000060000\n\
             BTCUSDT,42010.0,1.0,not-a-time\n",
        );

        let batch = CsvTickSource::new(file.path()).unwrap().load_all().unwrap();
        assert_eq!(batch.ticks.len(), 1);
        assert_eq!(batch.rejected, 2);
    }

    #[test]
    fn test_seconds_timestamps_are_scaled() {
        let file = write_csv(
            "symbol,price,volume,timestamp\n\
             ETHUSDT,2000.0,3.0,1700000000\n",
        );

        let batch = CsvTickSource::new(file.path()).unwrap().load_all().unwrap();
        assert_eq!(batch.ticks[0].timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_rfc3339_timestamps() {
        let file = write_csv(
            "symbol,price,volume,timestamp\n\
             ETHUSDT,2000.0,3.0,2023-11-14T22:13:20+00:00\n",
        );

        let batch = CsvTickSource::new(file.path()).unwrap().load_all().unwrap();
        assert_eq!(batch.ticks.len(), 1);
        assert_eq!(batch.ticks[0].timestamp, 1_700_000_000_000);
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvTickSource::new("/nonexistent/ticks.csv").is_err());
    }
}

//! Tick data type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single per-symbol price/volume observation.
///
/// Immutable once created. The constructor is the ingestion boundary:
/// it rejects malformed input so an invalid tick is never partially
/// incorporated into a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Symbol identifier (e.g. "BTCUSDT")
    pub symbol: String,
    /// Last traded price, strictly positive
    pub price: f64,
    /// Traded volume, non-negative
    pub volume: f64,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl Tick {
    /// Create a validated tick.
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        volume: f64,
        timestamp: i64,
    ) -> Result<Self, DataError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(DataError::InvalidTick("empty symbol".to_string()));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(DataError::InvalidTick(format!(
                "non-positive price {} for {}",
                price, symbol
            )));
        }
        if !volume.is_finite() || volume < 0.0 {
            return Err(DataError::InvalidTick(format!(
                "negative volume {} for {}",
                volume, symbol
            )));
        }
        if timestamp <= 0 {
            return Err(DataError::InvalidTick(format!(
                "invalid timestamp {} for {}",
                timestamp, symbol
            )));
        }
        Ok(Self {
            symbol,
            price,
            volume,
            timestamp,
        })
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

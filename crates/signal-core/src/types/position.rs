//! Position record.

use serde::{Deserialize, Serialize};

use super::Trend;

/// An open position in a single symbol.
///
/// Positions are owned and persisted by an external order-management
/// collaborator; the engine only reads them to evaluate exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub trend: Trend,
    pub entry_price: f64,
    /// Entry time, Unix milliseconds
    pub entry_timestamp: i64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, trend: Trend, entry_price: f64, entry_timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            trend,
            entry_price,
            entry_timestamp,
        }
    }

    /// Milliseconds elapsed since entry.
    pub fn holding_time_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.entry_timestamp
    }
}

//! Entry and exit signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a detected trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Long,
    Short,
}

impl Trend {
    pub fn is_long(&self) -> bool {
        matches!(self, Trend::Long)
    }

    pub fn is_short(&self) -> bool {
        matches!(self, Trend::Short)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Long => write!(f, "LONG"),
            Trend::Short => write!(f, "SHORT"),
        }
    }
}

/// Entry signal emitted when a short-horizon price move is corroborated
/// by the indicator battery.
///
/// Snapshots the triggering indicator row; not retained by the engine
/// after emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub trend: Trend,
    pub price: f64,
    /// Percent price change over the evaluation interval
    pub price_change: f64,
    pub rsi: f64,
    pub macd_diff: f64,
    pub adx: f64,
    /// EMA crossover sign at the triggering row (-1 or +1)
    pub ema_crossover: i8,
    pub stoch_k: f64,
    /// Detection time, Unix milliseconds
    pub timestamp: i64,
}

/// Exit signal emitted when an open position's indicators reverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitSignal {
    pub symbol: String,
    pub exit_price: f64,
    /// Direction-aware profit percentage at exit time
    pub profit_pct: f64,
    pub reason: String,
    /// Detection time, Unix milliseconds
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::Long.to_string(), "LONG");
        assert_eq!(Trend::Short.to_string(), "SHORT");
    }

    #[test]
    fn test_trend_direction_helpers() {
        assert!(Trend::Long.is_long());
        assert!(!Trend::Long.is_short());
        assert!(Trend::Short.is_short());
    }
}

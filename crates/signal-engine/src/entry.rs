//! Entry signal detection.

use serde::{Deserialize, Serialize};
use signal_core::{Signal, SignalError, Trend};
use tracing::debug;

use crate::frame::{IndicatorEngine, IndicatorRow};
use crate::window::TickWindowStore;

/// Entry detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Evaluation interval in minutes; doubles as the re-evaluation
    /// throttle and the minimum frame length
    pub interval_minutes: u64,
    /// Percent price change required over the interval
    pub price_change_threshold: f64,
    /// Minimum ADX for a trend to count as strong
    pub adx_threshold: f64,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 3,
            price_change_threshold: 3.0,
            adx_threshold: 25.0,
        }
    }
}

impl EntryConfig {
    pub fn interval_ms(&self) -> i64 {
        self.interval_minutes as i64 * 60 * 1000
    }

    pub fn min_rows(&self) -> usize {
        self.interval_minutes as usize
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if self.interval_minutes == 0 {
            return Err(SignalError::Config(
                "Evaluation interval must be greater than 0".into(),
            ));
        }
        if self.price_change_threshold <= 0.0 {
            return Err(SignalError::Config(
                "Price change threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Evaluates entry (trend) rules against the latest indicator row,
/// subject to a per-symbol re-evaluation throttle.
#[derive(Debug, Clone, Default)]
pub struct EntrySignalDetector {
    config: EntryConfig,
}

impl EntrySignalDetector {
    pub fn new(config: EntryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    /// Detect an entry signal for `symbol`.
    ///
    /// Returns `None` when history is insufficient, when the throttle
    /// window has not elapsed, or when neither predicate set matches.
    /// The throttle check and its update run under the store's mutable
    /// borrow, so they form a single step per symbol; `last_processed`
    /// advances on every call that reaches predicate evaluation,
    /// whether or not a signal fires.
    pub fn detect(
        &self,
        store: &mut TickWindowStore,
        engine: &IndicatorEngine,
        symbol: &str,
        now_ms: i64,
    ) -> Option<Signal> {
        let frame = engine.compute(symbol, store.get(symbol)).ok()?;
        if frame.len() < self.config.min_rows() {
            return None;
        }

        let window = store.window_mut(symbol)?;
        if now_ms - window.last_processed() < self.config.interval_ms() {
            return None;
        }
        window.set_last_processed(now_ms);

        let latest = *frame.last()?;
        let trend = self.evaluate_row(&latest)?;

        debug!(
            symbol,
            %trend,
            price = latest.price,
            price_change = latest.price_pct_change,
            rsi = latest.rsi,
            adx = latest.adx,
            "entry predicates matched"
        );

        Some(Signal {
            symbol: symbol.to_string(),
            trend,
            price: latest.price,
            price_change: latest.price_pct_change,
            rsi: latest.rsi,
            macd_diff: latest.macd_diff,
            adx: latest.adx,
            ema_crossover: latest.ema_crossover,
            stoch_k: latest.stoch_k,
            timestamp: now_ms,
        })
    }

    /// Evaluate the entry predicate sets against one indicator row.
    ///
    /// The LONG and SHORT sets are mutually exclusive by construction:
    /// the price change cannot exceed the threshold in both directions
    /// at once.
    pub fn evaluate_row(&self, row: &IndicatorRow) -> Option<Trend> {
        let strong_trend = row.adx > self.config.adx_threshold;

        if row.price_pct_change > self.config.price_change_threshold
            && row.rsi > 50.0
            && row.macd_diff > 0.0
            && row.price > row.vwap
            && row.ema_crossover >= 0
            && strong_trend
        {
            return Some(Trend::Long);
        }

        if row.price_pct_change < -self.config.price_change_threshold
            && row.rsi < 50.0
            && row.macd_diff < 0.0
            && row.price < row.vwap
            && row.ema_crossover <= 0
            && strong_trend
        {
            return Some(Trend::Short);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> EntrySignalDetector {
        EntrySignalDetector::new(EntryConfig::default())
    }

    fn row(price_pct_change: f64, rsi: f64, macd_diff: f64, price: f64, vwap: f64) -> IndicatorRow {
        IndicatorRow {
            timestamp: 1_700_000_000_000,
            price,
            volume: 1.0,
            rsi,
            macd: 0.0,
            macd_signal: 0.0,
            macd_diff,
            bb_upper: price * 1.02,
            bb_middle: price,
            bb_lower: price * 0.98,
            vwap,
            price_pct_change,
            ema_short: price,
            ema_long: price,
            ema_crossover: if macd_diff >= 0.0 { 1 } else { -1 },
            adx: 40.0,
            adx_pos: 30.0,
            adx_neg: 10.0,
            stoch_k: 50.0,
            stoch_d: 50.0,
        }
    }

    #[test]
    fn test_long_predicates() {
        let long_row = row(4.0, 65.0, 0.5, 105.0, 100.0);
        assert_eq!(detector().evaluate_row(&long_row), Some(Trend::Long));
    }

    #[test]
    fn test_short_predicates() {
        let short_row = row(-4.0, 35.0, -0.5, 95.0, 100.0);
        assert_eq!(detector().evaluate_row(&short_row), Some(Trend::Short));
    }

    #[test]
    fn test_no_signal_on_weak_move() {
        let weak_row = row(1.0, 65.0, 0.5, 105.0, 100.0);
        assert_eq!(detector().evaluate_row(&weak_row), None);
    }

    #[test]
    fn test_weak_adx_blocks_entry() {
        let mut strong_row = row(4.0, 65.0, 0.5, 105.0, 100.0);
        strong_row.adx = 20.0;
        assert_eq!(detector().evaluate_row(&strong_row), None);
    }

    #[test]
    fn test_predicate_sets_are_exclusive() {
        // A qualifying long row fails every short predicate and vice
        // versa; the price change can only breach one bound.
        let detector = detector();

        let long_row = row(4.0, 65.0, 0.5, 105.0, 100.0);
        assert_eq!(detector.evaluate_row(&long_row), Some(Trend::Long));

        let short_row = row(-4.0, 35.0, -0.5, 95.0, 100.0);
        assert_eq!(detector.evaluate_row(&short_row), Some(Trend::Short));

        for candidate in [&long_row, &short_row] {
            let long_fires = candidate.price_pct_change > 3.0;
            let short_fires = candidate.price_pct_change < -3.0;
            assert!(!(long_fires && short_fires));
        }
    }

    #[test]
    fn test_price_below_vwap_blocks_long() {
        let below_vwap = row(4.0, 65.0, 0.5, 99.0, 100.0);
        assert_eq!(detector().evaluate_row(&below_vwap), None);
    }
}

//! Exit signal detection for open positions.

use serde::{Deserialize, Serialize};
use signal_core::{ExitSignal, Position, SignalError, Trend};
use tracing::debug;

use crate::frame::{IndicatorEngine, IndicatorFrame};
use crate::window::TickWindowStore;

/// Every exit carries the same reason string: the detector reports
/// that a reversal happened, not which predicate caught it.
const EXIT_REASON: &str = "Trend reversal detected";

// Reversal rule constants, per trend direction.
const LONG_REVERSAL_RSI: f64 = 40.0;
const LONG_OVERBOUGHT_RSI: f64 = 75.0;
const LONG_OVERBOUGHT_STOCH: f64 = 80.0;
const LONG_VWAP_RATIO: f64 = 0.99;
const SHORT_REVERSAL_RSI: f64 = 60.0;
const SHORT_OVERSOLD_RSI: f64 = 25.0;
const SHORT_OVERSOLD_STOCH: f64 = 20.0;
const SHORT_VWAP_RATIO: f64 = 1.01;

/// Exit detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    /// Minimum holding period before any exit can fire, in minutes
    pub min_holding_minutes: u64,
    /// Minimum indicator rows required for evaluation
    pub min_rows: usize,
    /// MACD histogram magnitude that counts as a strong reversal
    pub macd_epsilon: f64,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            min_holding_minutes: 15,
            min_rows: 5,
            macd_epsilon: 0.0002,
        }
    }
}

impl ExitConfig {
    pub fn min_holding_ms(&self) -> i64 {
        self.min_holding_minutes as i64 * 60 * 1000
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if self.min_rows < 2 {
            return Err(SignalError::Config(
                "Exit evaluation needs at least 2 indicator rows".into(),
            ));
        }
        if self.macd_epsilon < 0.0 {
            return Err(SignalError::Config(
                "MACD epsilon must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Evaluates reversal rules against an open position's indicator
/// history, subject to a minimum holding period.
#[derive(Debug, Clone, Default)]
pub struct ExitSignalDetector {
    config: ExitConfig,
}

impl ExitSignalDetector {
    pub fn new(config: ExitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExitConfig {
        &self.config
    }

    /// Detect an exit signal for an open position.
    ///
    /// Within the minimum holding period this returns `None`
    /// unconditionally, before any indicator work.
    pub fn detect(
        &self,
        store: &TickWindowStore,
        engine: &IndicatorEngine,
        position: &Position,
        now_ms: i64,
    ) -> Option<ExitSignal> {
        if position.holding_time_ms(now_ms) < self.config.min_holding_ms() {
            return None;
        }

        let frame = engine
            .compute(&position.symbol, store.get(&position.symbol))
            .ok()?;
        self.evaluate(&frame, position, now_ms)
    }

    /// Evaluate the reversal predicates against a computed frame.
    ///
    /// The crossover check is a genuine two-row comparison: the latest
    /// row's EMA crossover sign against the immediately preceding
    /// row's.
    pub fn evaluate(
        &self,
        frame: &IndicatorFrame,
        position: &Position,
        now_ms: i64,
    ) -> Option<ExitSignal> {
        if frame.len() < self.config.min_rows {
            return None;
        }

        let latest = frame.last()?;
        let previous = frame.previous()?;
        let current_price = latest.price;
        let epsilon = self.config.macd_epsilon;

        let (profit_pct, reversal) = match position.trend {
            Trend::Long => (
                (current_price - position.entry_price) / position.entry_price * 100.0,
                (latest.macd_diff < -epsilon && latest.rsi < LONG_REVERSAL_RSI)
                    || (latest.rsi > LONG_OVERBOUGHT_RSI && latest.stoch_k > LONG_OVERBOUGHT_STOCH)
                    || latest.price < latest.vwap * LONG_VWAP_RATIO
                    || (latest.ema_crossover == -1 && previous.ema_crossover == 1),
            ),
            Trend::Short => (
                (position.entry_price - current_price) / position.entry_price * 100.0,
                (latest.macd_diff > epsilon && latest.rsi > SHORT_REVERSAL_RSI)
                    || (latest.rsi < SHORT_OVERSOLD_RSI && latest.stoch_k < SHORT_OVERSOLD_STOCH)
                    || latest.price > latest.vwap * SHORT_VWAP_RATIO
                    || (latest.ema_crossover == 1 && previous.ema_crossover == -1),
            ),
        };

        if !reversal {
            return None;
        }

        debug!(
            symbol = %position.symbol,
            trend = %position.trend,
            exit_price = current_price,
            profit_pct,
            "reversal predicates matched"
        );

        Some(ExitSignal {
            symbol: position.symbol.clone(),
            exit_price: current_price,
            profit_pct,
            reason: EXIT_REASON.to_string(),
            timestamp: now_ms,
        })
    }
}

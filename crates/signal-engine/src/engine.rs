//! Engine facade wiring the window store, frame computation and both
//! detectors together.

use serde::{Deserialize, Serialize};
use signal_core::{ExitSignal, IndicatorError, Position, Signal, SignalError, Tick};
use tracing::trace;

use crate::entry::{EntryConfig, EntrySignalDetector};
use crate::exit::{ExitConfig, ExitSignalDetector};
use crate::frame::{IndicatorConfig, IndicatorEngine, IndicatorFrame, IndicatorRow};
use crate::window::{TickWindowStore, WindowConfig};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub exit: ExitConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        self.window.validate()?;
        self.indicators.validate()?;
        self.entry.validate()?;
        self.exit.validate()?;
        if self.indicators.change_lag != self.entry.interval_minutes as usize {
            return Err(SignalError::Config(
                "Price change lag must equal the evaluation interval".into(),
            ));
        }
        Ok(())
    }
}

/// The complete tick-to-signal pipeline for a set of symbols.
///
/// Pure and synchronous: ticks go in through [`on_tick`], signals come
/// out of the two `detect_*` calls, and all state is re-derivable from
/// the tick history. Ingestion and entry detection take `&mut self`,
/// which makes write exclusivity per symbol explicit; callers with
/// concurrent producers must wrap the engine (or shard it per symbol)
/// behind their own lock.
///
/// [`on_tick`]: SignalEngine::on_tick
#[derive(Debug, Default)]
pub struct SignalEngine {
    store: TickWindowStore,
    indicators: IndicatorEngine,
    entry: EntrySignalDetector,
    exit: ExitSignalDetector,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: TickWindowStore::new(&config.window),
            indicators: IndicatorEngine::new(config.indicators),
            entry: EntrySignalDetector::new(config.entry),
            exit: ExitSignalDetector::new(config.exit),
        }
    }

    /// Ingest one validated tick, pruning the symbol's window to the
    /// retention horizon measured from `now_ms`.
    pub fn on_tick(&mut self, tick: Tick, now_ms: i64) {
        trace!(symbol = %tick.symbol, price = tick.price, "tick");
        self.store.append(tick, now_ms);
    }

    /// Compute the current indicator frame for a symbol.
    pub fn compute(&self, symbol: &str) -> Result<IndicatorFrame, IndicatorError> {
        self.indicators.compute(symbol, self.store.get(symbol))
    }

    /// Evaluate entry rules for a symbol; throttled per symbol to one
    /// evaluation per interval.
    pub fn detect_entry(&mut self, symbol: &str, now_ms: i64) -> Option<Signal> {
        self.entry
            .detect(&mut self.store, &self.indicators, symbol, now_ms)
    }

    /// Evaluate exit rules for an externally-owned open position.
    pub fn detect_exit(&self, position: &Position, now_ms: i64) -> Option<ExitSignal> {
        self.exit
            .detect(&self.store, &self.indicators, position, now_ms)
    }

    /// Most recent `n` indicator rows for downstream consumers, or
    /// `None` while history is insufficient.
    pub fn market_data(&self, symbol: &str, n: usize) -> Option<Vec<IndicatorRow>> {
        let frame = self.compute(symbol).ok()?;
        Some(frame.tail(n).to_vec())
    }

    pub fn store(&self) -> &TickWindowStore {
        &self.store
    }
}

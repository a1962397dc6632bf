//! Per-symbol tick windows.

use serde::{Deserialize, Serialize};
use signal_core::{SignalError, Tick};
use std::collections::HashMap;

/// Window retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Retention horizon in hours
    pub retention_hours: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { retention_hours: 3 }
    }
}

impl WindowConfig {
    pub fn retention_ms(&self) -> i64 {
        self.retention_hours as i64 * 60 * 60 * 1000
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if self.retention_hours == 0 {
            return Err(SignalError::Config(
                "Retention horizon must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Time-bounded ordered tick sequence for one symbol.
///
/// Ticks are kept in ascending timestamp order with unique timestamps;
/// out-of-order arrivals are inserted in place and exact duplicates
/// keep the first-seen tick. `last_processed` tracks the entry
/// detector's throttle for this symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolWindow {
    ticks: Vec<Tick>,
    last_processed: i64,
}

impl SymbolWindow {
    fn insert(&mut self, tick: Tick) {
        match self.ticks.binary_search_by_key(&tick.timestamp, |t| t.timestamp) {
            // Duplicate timestamp: keep the existing tick
            Ok(_) => {}
            Err(index) => self.ticks.insert(index, tick),
        }
    }

    fn prune(&mut self, cutoff_ms: i64) {
        self.ticks.retain(|t| t.timestamp > cutoff_ms);
    }

    /// Ordered tick sequence.
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Timestamp of the last entry evaluation for this symbol
    /// (0 until the first one).
    pub fn last_processed(&self) -> i64 {
        self.last_processed
    }

    pub fn set_last_processed(&mut self, now_ms: i64) {
        self.last_processed = now_ms;
    }
}

/// Registry of per-symbol tick windows, created lazily on first tick.
///
/// Symbols are never evicted once seen, matching the upstream feed
/// behavior; long-running processes with a churning symbol universe
/// grow without bound. A single mutable reference serializes all
/// writes, so per-symbol ingestion order is the caller's contract:
/// concurrent producers must share the store behind a lock of their
/// own.
#[derive(Debug, Default)]
pub struct TickWindowStore {
    windows: HashMap<String, SymbolWindow>,
    retention_ms: i64,
}

impl TickWindowStore {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            windows: HashMap::new(),
            retention_ms: config.retention_ms(),
        }
    }

    /// Insert a tick into its symbol's window, then prune everything
    /// older than the retention horizon measured from `now_ms`.
    ///
    /// After this call every retained tick satisfies
    /// `timestamp > now_ms - retention`.
    pub fn append(&mut self, tick: Tick, now_ms: i64) {
        let window = self.windows.entry(tick.symbol.clone()).or_default();
        window.insert(tick);
        window.prune(now_ms - self.retention_ms);
    }

    /// Ordered tick sequence for a symbol; empty if unseen.
    pub fn get(&self, symbol: &str) -> &[Tick] {
        self.windows.get(symbol).map(|w| w.ticks()).unwrap_or(&[])
    }

    pub fn window(&self, symbol: &str) -> Option<&SymbolWindow> {
        self.windows.get(symbol)
    }

    pub fn window_mut(&mut self, symbol: &str) -> Option<&mut SymbolWindow> {
        self.windows.get_mut(symbol)
    }

    /// Symbols with at least one retained tick at some point.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }

    pub fn symbol_count(&self) -> usize {
        self.windows.len()
    }
}

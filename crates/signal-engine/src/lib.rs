//! Tick-to-signal pipeline.
//!
//! Converts a continuous stream of per-symbol price/volume ticks into
//! trading signals:
//! - [`TickWindowStore`] keeps a time-bounded ordered tick window per
//!   symbol.
//! - [`IndicatorEngine`] derives a full indicator frame from a window.
//! - [`EntrySignalDetector`] evaluates trend-entry rules against the
//!   latest row, throttled per symbol.
//! - [`ExitSignalDetector`] evaluates reversal rules for open
//!   positions after a minimum holding period.
//! - [`SignalEngine`] wires the four together behind one facade.
//!
//! The pipeline performs no I/O and owns no clock; callers pass
//! `now_ms` explicitly, which keeps every operation deterministic and
//! replayable.

mod engine;
mod entry;
mod exit;
mod frame;
mod window;

pub use engine::{EngineConfig, SignalEngine};
pub use entry::{EntryConfig, EntrySignalDetector};
pub use exit::{ExitConfig, ExitSignalDetector};
pub use frame::{IndicatorConfig, IndicatorEngine, IndicatorFrame, IndicatorRow};
pub use window::{SymbolWindow, TickWindowStore, WindowConfig};

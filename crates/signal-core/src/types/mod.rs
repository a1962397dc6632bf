//! Core data types for the signal engine.

mod position;
mod signal;
mod tick;

pub use position::Position;
pub use signal::{ExitSignal, Signal, Trend};
pub use tick::Tick;

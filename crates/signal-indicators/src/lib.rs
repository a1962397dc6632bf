//! Technical indicators for the signal engine.
//!
//! Batch implementations of the indicator battery used for trend
//! detection:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD, Stochastic)
//! - Volatility indicators (Bollinger Bands)
//! - Trend-strength indicators (ADX with directional components)
//!
//! All indicators are pure functions of their input slice; outputs are
//! aligned to the end of the input so columns with different warm-ups
//! can be zipped over a common tail.

pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volatility;

pub use momentum::{Macd, MacdOutput, Rsi, Stochastic, StochasticOutput};
pub use moving_average::{Ema, Sma};
pub use trend::{Adx, AdxOutput};
pub use volatility::{BollingerBands, BollingerOutput};

//! Error types for the signal engine.

use thiserror::Error;

/// Top-level signal engine error.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Tick ingestion and data source errors.
///
/// A malformed tick is rejected here, at the boundary, before it can
/// reach a symbol window.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid tick: {0}")]
    InvalidTick(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No data available")]
    NoDataAvailable,
}

/// Indicator calculation errors.
///
/// Note that `InsufficientData` is expected during warm-up and is
/// mapped to "no signal" by the detectors rather than surfaced.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for signal engine operations.
pub type SignalResult<T> = Result<T, SignalError>;

//! Core types and traits for the signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Tick data types
//! - Entry and exit signal types
//! - Position records (owned externally, read here)
//! - Indicator traits

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, IndicatorError, SignalError, SignalResult};
pub use traits::*;
pub use types::*;

//! Tick data sources.
//!
//! The live feed is an external collaborator; this crate provides the
//! in-repo substitute, replaying recorded ticks from CSV files through
//! the pipeline.

mod csv_source;

pub use csv_source::{CsvTickSource, TickBatch};

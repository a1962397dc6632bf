//! Logging setup and signal reporting.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{report_entry, report_exit, ReplaySummary};

//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// True for the formats rendered as JSON lines; anything else gets
/// the human-readable pretty layer.
fn is_json(format: &str) -> bool {
    format.eq_ignore_ascii_case("json")
}

/// Initialize the global subscriber from the logging settings.
///
/// `level` and `format` take the values of the `[logging]` config
/// section ("pretty" or "json"); `RUST_LOG` overrides the level when
/// set.
pub fn setup_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    if is_json(format) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

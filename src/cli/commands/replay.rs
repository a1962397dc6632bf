//! Replay command implementation.

use anyhow::{Context, Result};
use signal_core::Position;
use signal_data::CsvTickSource;
use signal_engine::SignalEngine;
use signal_monitor::{report_entry, report_exit, ReplaySummary};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::cli::ReplayArgs;

pub async fn run(args: ReplayArgs, config_path: &Path) -> Result<()> {
    let config = signal_config::load_config(config_path)
        .context("Failed to load configuration")?;
    config.engine.validate().context("Invalid engine configuration")?;

    info!("Replaying ticks from {:?}", args.data);

    let source = CsvTickSource::new(&args.data)?;
    let batch = source.load_all()?;
    if batch.ticks.is_empty() {
        anyhow::bail!("No usable ticks in '{}'", args.data.display());
    }

    let mut engine = SignalEngine::new(config.engine);
    let mut positions: HashMap<String, Position> = HashMap::new();
    let mut summary = ReplaySummary {
        ticks: batch.ticks.len(),
        rejected: batch.rejected,
        ..Default::default()
    };

    for tick in batch.ticks {
        if !args.symbols.is_empty() && !args.symbols.contains(&tick.symbol) {
            continue;
        }
        // The tick's own timestamp drives the clock, so replay is
        // independent of wall time.
        let now = tick.timestamp;
        let symbol = tick.symbol.clone();
        engine.on_tick(tick, now);

        if let Some(position) = positions.get(&symbol) {
            if let Some(exit) = engine.detect_exit(position, now) {
                report_exit(&exit);
                summary.exits += 1;
                positions.remove(&symbol);
            }
            continue;
        }

        if let Some(signal) = engine.detect_entry(&symbol, now) {
            report_entry(&signal);
            summary.entries += 1;
            if args.track_positions {
                positions.insert(
                    symbol.clone(),
                    Position {
                        symbol,
                        trend: signal.trend,
                        entry_price: signal.price,
                        entry_timestamp: signal.timestamp,
                    },
                );
            }
        }
    }

    summary.symbols = engine.store().symbol_count();
    summary.print();

    if !positions.is_empty() {
        println!();
        println!("Open positions at end of replay:");
        for position in positions.values() {
            println!(
                "  {} {} @ {}",
                position.symbol, position.trend, position.entry_price
            );
        }
    }

    Ok(())
}

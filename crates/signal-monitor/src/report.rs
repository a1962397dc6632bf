//! Structured reporting for detected signals.

use chrono::DateTime;
use serde::Serialize;
use signal_core::{ExitSignal, Signal};
use tracing::info;

fn format_ts(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Log an entry signal.
pub fn report_entry(signal: &Signal) {
    info!(
        symbol = %signal.symbol,
        trend = %signal.trend,
        price = signal.price,
        price_change = format!("{:.2}%", signal.price_change),
        rsi = format!("{:.1}", signal.rsi),
        macd_diff = format!("{:.6}", signal.macd_diff),
        adx = format!("{:.1}", signal.adx),
        ema_crossover = signal.ema_crossover,
        stoch_k = format!("{:.1}", signal.stoch_k),
        time = %format_ts(signal.timestamp),
        "entry signal"
    );
}

/// Log an exit signal.
pub fn report_exit(exit: &ExitSignal) {
    info!(
        symbol = %exit.symbol,
        exit_price = exit.exit_price,
        profit = format!("{:.2}%", exit.profit_pct),
        reason = %exit.reason,
        time = %format_ts(exit.timestamp),
        "exit signal"
    );
}

/// Aggregate counts for a replay run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ReplaySummary {
    pub ticks: usize,
    pub rejected: usize,
    pub entries: usize,
    pub exits: usize,
    pub symbols: usize,
}

impl ReplaySummary {
    pub fn print(&self) {
        println!();
        println!("Replay Summary");
        println!("==============");
        println!("Ticks processed:  {}", self.ticks);
        println!("Ticks rejected:   {}", self.rejected);
        println!("Symbols tracked:  {}", self.symbols);
        println!("Entry signals:    {}", self.entries);
        println!("Exit signals:     {}", self.exits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ts() {
        assert_eq!(format_ts(0), "1970-01-01 00:00:00");
        assert_eq!(format_ts(1_700_000_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_summary_default() {
        let summary = ReplaySummary::default();
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.entries, 0);
    }
}

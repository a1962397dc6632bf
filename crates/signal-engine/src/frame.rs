//! Indicator frame assembly.

use serde::{Deserialize, Serialize};
use signal_core::{IndicatorError, SignalError, Tick};
use signal_indicators::{Adx, BollingerBands, Ema, Macd, Rsi, Stochastic};
use signal_core::traits::{Indicator, MultiOutputIndicator};

/// Indicator period configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub adx_period: usize,
    pub stoch_period: usize,
    pub stoch_smooth: usize,
    /// Row lag for the percent price change (= evaluation interval)
    pub change_lag: usize,
    /// Minimum deduplicated tick count before computing a frame
    pub min_samples: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            ema_short_period: 50,
            ema_long_period: 200,
            adx_period: 14,
            stoch_period: 14,
            stoch_smooth: 3,
            change_lag: 3,
            min_samples: 30,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.macd_fast >= self.macd_slow {
            return Err(SignalError::Config(
                "MACD fast period must be less than slow period".into(),
            ));
        }
        if self.ema_short_period >= self.ema_long_period {
            return Err(SignalError::Config(
                "Short EMA period must be less than long EMA period".into(),
            ));
        }
        if self.bollinger_period < 2 {
            return Err(SignalError::Config(
                "Bollinger period must be at least 2".into(),
            ));
        }
        if self.rsi_period == 0
            || self.adx_period == 0
            || self.stoch_period == 0
            || self.stoch_smooth == 0
            || self.change_lag == 0
        {
            return Err(SignalError::Config(
                "Indicator periods must be greater than 0".into(),
            ));
        }
        if self.min_samples == 0 {
            return Err(SignalError::Config(
                "Minimum sample count must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Rows lost to the longest indicator warm-up.
    ///
    /// MACD and the trend EMAs are seeded from the first sample and
    /// contribute no warm-up; with default periods the ADX binds at
    /// `2 * 14 - 1 = 27`, so the 30-tick minimum always leaves rows.
    fn warmup(&self) -> usize {
        [
            self.rsi_period,
            self.bollinger_period - 1,
            self.stoch_period + self.stoch_smooth - 2,
            2 * self.adx_period - 1,
            self.change_lag,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// One derived row of the indicator frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    /// Source tick timestamp, Unix milliseconds
    pub timestamp: i64,
    pub price: f64,
    pub volume: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_diff: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    /// Running VWAP anchored to the start of the retained window
    pub vwap: f64,
    /// Percent price change over the configured row lag
    pub price_pct_change: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    /// +1 when the short EMA is at or above the long EMA, -1 otherwise
    pub ema_crossover: i8,
    pub adx: f64,
    pub adx_pos: f64,
    pub adx_neg: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
}

impl IndicatorRow {
    /// A row is usable only when every derived value is defined.
    fn is_finite(&self) -> bool {
        [
            self.price,
            self.volume,
            self.rsi,
            self.macd,
            self.macd_signal,
            self.macd_diff,
            self.bb_upper,
            self.bb_middle,
            self.bb_lower,
            self.vwap,
            self.price_pct_change,
            self.ema_short,
            self.ema_long,
            self.adx,
            self.adx_pos,
            self.adx_neg,
            self.stoch_k,
            self.stoch_d,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Immutable, time-ordered indicator rows for one symbol.
///
/// Produced fresh on every `compute` call; a pure function of the
/// window contents and the period configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    symbol: String,
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn new(symbol: impl Into<String>, rows: Vec<IndicatorRow>) -> Self {
        Self {
            symbol: symbol.into(),
            rows,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&IndicatorRow> {
        self.rows.get(index)
    }

    /// Latest row.
    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Row immediately preceding the latest one.
    pub fn previous(&self) -> Option<&IndicatorRow> {
        self.rows.len().checked_sub(2).and_then(|i| self.rows.get(i))
    }

    /// Last `n` rows, oldest first.
    pub fn tail(&self, n: usize) -> &[IndicatorRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }
}

/// Derives a full indicator frame from a symbol's tick window.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Compute the indicator frame for a tick sequence.
    ///
    /// The input is re-sorted by timestamp and deduplicated before any
    /// derivation, tolerating out-of-order arrival. Fewer than
    /// `min_samples` ticks, or a frame emptied by warm-up and
    /// undefined-value exclusion, reports `InsufficientData`.
    pub fn compute(&self, symbol: &str, ticks: &[Tick]) -> Result<IndicatorFrame, IndicatorError> {
        let cfg = &self.config;

        let mut ticks: Vec<Tick> = ticks.to_vec();
        ticks.sort_by_key(|t| t.timestamp);
        ticks.dedup_by_key(|t| t.timestamp);

        let n = ticks.len();
        if n < cfg.min_samples {
            return Err(IndicatorError::InsufficientData {
                required: cfg.min_samples,
                available: n,
            });
        }

        let warmup = cfg.warmup();
        if n <= warmup {
            return Err(IndicatorError::InsufficientData {
                required: warmup + 1,
                available: n,
            });
        }

        let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
        let volumes: Vec<f64> = ticks.iter().map(|t| t.volume).collect();

        let rsi = Rsi::new(cfg.rsi_period).calculate(&prices);
        let macd = Macd::with_periods(cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)
            .calculate(&prices);
        let bollinger = BollingerBands::with_params(cfg.bollinger_period, cfg.bollinger_std_dev)
            .calculate(&prices);
        let stoch = Stochastic::with_periods(cfg.stoch_period, cfg.stoch_smooth)
            .calculate(&prices);
        let adx = Adx::new(cfg.adx_period).calculate(&prices);

        // Trend EMAs run pandas-style from the first sample: the long
        // period routinely exceeds the retained window, and an SMA
        // seed would leave the crossover undefined on fresh windows.
        let ema_short = Ema::new(cfg.ema_short_period).calculate_from_first(&prices);
        let ema_long = Ema::new(cfg.ema_long_period).calculate_from_first(&prices);

        // Running VWAP anchored to the window start. This is a known
        // approximation of session VWAP and is intentionally not reset
        // on calendar boundaries.
        let mut vwap = Vec::with_capacity(n);
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;
        for i in 0..n {
            cum_pv += prices[i] * volumes[i];
            cum_volume += volumes[i];
            vwap.push(if cum_volume > 0.0 {
                cum_pv / cum_volume
            } else {
                f64::NAN
            });
        }

        let pct_change: Vec<f64> = (cfg.change_lag..n)
            .map(|i| {
                let base = prices[i - cfg.change_lag];
                (prices[i] - base) / base * 100.0
            })
            .collect();

        // All indicator columns are tail-aligned; zip them over the
        // rows surviving the longest warm-up.
        let len = n - warmup;
        let tail = |col_len: usize, j: usize| col_len - len + j;

        let mut rows = Vec::with_capacity(len);
        for j in 0..len {
            let i = warmup + j;
            let macd_out = macd[tail(macd.len(), j)];
            let bb = bollinger[tail(bollinger.len(), j)];
            let st = stoch[tail(stoch.len(), j)];
            let dx = adx[tail(adx.len(), j)];

            let row = IndicatorRow {
                timestamp: ticks[i].timestamp,
                price: prices[i],
                volume: volumes[i],
                rsi: rsi[tail(rsi.len(), j)],
                macd: macd_out.macd,
                macd_signal: macd_out.signal,
                macd_diff: macd_out.diff,
                bb_upper: bb.upper,
                bb_middle: bb.middle,
                bb_lower: bb.lower,
                vwap: vwap[i],
                price_pct_change: pct_change[tail(pct_change.len(), j)],
                ema_short: ema_short[i],
                ema_long: ema_long[i],
                ema_crossover: if ema_short[i] >= ema_long[i] { 1 } else { -1 },
                adx: dx.adx,
                adx_pos: dx.plus_di,
                adx_neg: dx.minus_di,
                stoch_k: st.k,
                stoch_d: st.d,
            };

            // Undefined arithmetic excludes the row instead of
            // propagating a corrupt value.
            if row.is_finite() {
                rows.push(row);
            }
        }

        if rows.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: warmup + 1,
                available: n,
            });
        }

        Ok(IndicatorFrame::new(symbol, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE_MS: i64 = 60_000;
    const BASE_TS: i64 = 1_700_000_000_000;

    fn ticks_from_prices(symbol: &str, prices: &[f64], volume: f64) -> Vec<Tick> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                Tick::new(symbol, price, volume, BASE_TS + i as i64 * MINUTE_MS).unwrap()
            })
            .collect()
    }

    fn rising_prices(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.002f64.powi(i as i32)).collect()
    }

    fn engine() -> IndicatorEngine {
        IndicatorEngine::new(IndicatorConfig::default())
    }

    #[test]
    fn test_insufficient_below_min_samples() {
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(29), 1.0);
        let result = engine().compute("BTCUSDT", &ticks);

        match result {
            Err(IndicatorError::InsufficientData { required, available }) => {
                assert_eq!(required, 30);
                assert_eq!(available, 29);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_minimum_window_yields_a_frame() {
        // Exactly min_samples ticks clear every warm-up: the ADX
        // binds at 27 rows, leaving 30 - 27 = 3
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(30), 1.0);
        let frame = engine().compute("BTCUSDT", &ticks).unwrap();

        assert_eq!(frame.len(), 3);
    }

    #[test]
    fn test_frame_row_count_after_warmup() {
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(60), 1.0);
        let frame = engine().compute("BTCUSDT", &ticks).unwrap();

        // Binding warm-up is ADX: 2 * period - 1 = 27
        assert_eq!(frame.len(), 60 - 27);
    }

    #[test]
    fn test_frame_rows_are_time_ordered() {
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(60), 1.0);
        let frame = engine().compute("BTCUSDT", &ticks).unwrap();

        for pair in frame.rows().windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(70), 2.5);
        let engine = engine();

        let first = engine.compute("BTCUSDT", &ticks).unwrap();
        let second = engine.compute("BTCUSDT", &ticks).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_tolerates_unsorted_input() {
        let mut ticks = ticks_from_prices("BTCUSDT", &rising_prices(60), 1.0);
        let sorted_frame = engine().compute("BTCUSDT", &ticks).unwrap();

        ticks.reverse();
        let reversed_frame = engine().compute("BTCUSDT", &ticks).unwrap();
        assert_eq!(sorted_frame, reversed_frame);
    }

    #[test]
    fn test_rising_series_rsi_and_crossover() {
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(80), 1.0);
        let frame = engine().compute("BTCUSDT", &ticks).unwrap();
        let latest = frame.last().unwrap();

        // Monotonic gains push RSI to its upper bound and keep the
        // short EMA above the long one
        assert!(latest.rsi > 99.0);
        assert_eq!(latest.ema_crossover, 1);
        assert!(latest.macd_diff > 0.0);
        assert!(latest.price > latest.vwap);
    }

    #[test]
    fn test_constant_volume_vwap_is_running_mean() {
        let prices = rising_prices(60);
        let ticks = ticks_from_prices("BTCUSDT", &prices, 3.0);
        let frame = engine().compute("BTCUSDT", &ticks).unwrap();

        // With constant volume the running VWAP reduces to the mean of
        // all prices since window start
        let latest = frame.last().unwrap();
        let expected: f64 = prices.iter().sum::<f64>() / prices.len() as f64;
        assert!((latest.vwap - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_rows_are_excluded() {
        let ticks = ticks_from_prices("BTCUSDT", &rising_prices(60), 0.0);
        // Zero cumulative volume leaves VWAP undefined on every row
        assert!(engine().compute("BTCUSDT", &ticks).is_err());
    }

    #[test]
    fn test_pct_change_matches_lag() {
        let prices = rising_prices(60);
        let ticks = ticks_from_prices("BTCUSDT", &prices, 1.0);
        let frame = engine().compute("BTCUSDT", &ticks).unwrap();

        let lag = IndicatorConfig::default().change_lag;
        let latest = frame.last().unwrap();
        let n = prices.len();
        let expected = (prices[n - 1] - prices[n - 1 - lag]) / prices[n - 1 - lag] * 100.0;
        assert!((latest.price_pct_change - expected).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_timestamps_deduplicated_before_compute() {
        let mut ticks = ticks_from_prices("BTCUSDT", &rising_prices(60), 1.0);
        let dup = ticks[10].clone();
        ticks.push(dup);

        let frame = engine().compute("BTCUSDT", &ticks).unwrap();
        assert_eq!(frame.len(), 60 - 27);
    }

    #[test]
    fn test_config_validation() {
        let mut config = IndicatorConfig::default();
        assert!(config.validate().is_ok());

        config.macd_fast = 30;
        assert!(config.validate().is_err());

        config = IndicatorConfig {
            ema_short_period: 200,
            ema_long_period: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

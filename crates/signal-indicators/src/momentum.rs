//! Momentum indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::Ema;

/// Wilder's smoothing: seeded with a plain average over the first
/// period, then `avg = (prev * (period - 1) + value) / period`.
pub(crate) fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return vec![];
    }

    let period_f64 = period as f64;
    let mut result = Vec::with_capacity(values.len() - period + 1);

    let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
    result.push(avg);

    for &value in &values[period..] {
        avg = (avg * (period_f64 - 1.0) + value) / period_f64;
        result.push(avg);
    }

    result
}

/// Relative Strength Index (RSI).
///
/// Momentum oscillator bounded to [0, 100], computed with Wilder-style
/// smoothing of average gains and losses.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. The conventional period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for pair in data.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let avg_gains = wilder_smooth(&gains, self.period);
        let avg_losses = wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    100.0
                } else {
                    100.0 - 100.0 / (1.0 + gain / loss)
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence/Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of the MACD line)
    pub signal: f64,
    /// MACD line minus signal line
    pub diff: f64,
}

/// MACD indicator.
///
/// Difference of a fast and slow EMA plus a smoothed signal line. All
/// three EMAs run the first-sample-seeded recursion, so the output is
/// defined at every input index with no warm-up drop; early values
/// converge toward the steady-state formula as the window grows.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with the conventional 12/26/9 periods.
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        let fast_ema = Ema::new(self.fast_period).calculate_from_first(data);
        let slow_ema = Ema::new(self.slow_period).calculate_from_first(data);

        // Both EMAs cover every input index, so the lines zip directly
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| fast - slow)
            .collect();

        let signal_line = Ema::new(self.signal_period).calculate_from_first(&macd_line);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                diff: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        // First-sample seeding: one output per input
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (raw stochastic)
    pub k: f64,
    /// %D (SMA of %K)
    pub d: f64,
}

/// Stochastic oscillator.
///
/// Compares the latest value to the high-low range over a lookback
/// window. When only last prices are available (no OHLC), the price
/// series stands in for high, low and close; the window max/min still
/// provide a meaningful range.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a stochastic oscillator with the conventional 14/3 periods.
    pub fn new() -> Self {
        Self::with_periods(14, 3)
    }

    /// Create with custom %K and %D periods.
    pub fn with_periods(k_period: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && d_period > 0);
        Self { k_period, d_period }
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Stochastic {
    type Output = StochasticOutput;

    fn calculate(&self, data: &[f64]) -> Vec<StochasticOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let mut k_values = Vec::with_capacity(data.len() - self.k_period + 1);

        for window in data.windows(self.k_period) {
            let highest = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().cloned().fold(f64::INFINITY, f64::min);
            let close = window[self.k_period - 1];

            let range = highest - lowest;
            let k = if range == 0.0 {
                // Flat range leaves %K undefined; use the midpoint
                50.0
            } else {
                (close - lowest) / range * 100.0
            };
            k_values.push(k);
        }

        if k_values.len() < self.d_period {
            return vec![];
        }

        let d_period_f64 = self.d_period as f64;
        k_values
            .windows(self.d_period)
            .map(|window| StochasticOutput {
                k: window[self.d_period - 1],
                d: window.iter().sum::<f64>() / d_period_f64,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_bounds() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        assert!((result[0] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        assert!(result[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_output_length() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.1).collect();
        // Tail alignment: warm-up equals the period
        assert_eq!(rsi.calculate(&data).len(), 60 - 14);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert!(!result.is_empty());
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_defined_at_every_index() {
        let macd = Macd::with_periods(12, 26, 9);
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.3).collect();
        assert_eq!(macd.calculate(&data).len(), 60);
    }

    #[test]
    fn test_macd_first_output_is_zero() {
        // At index 0 every EMA equals the first sample, so both lines
        // start at zero
        let macd = Macd::new();
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 30);
        assert!(result[0].macd.abs() < 1e-12);
        assert!(result[0].signal.abs() < 1e-12);
        assert!(result[0].diff.abs() < 1e-12);
    }

    #[test]
    fn test_macd_empty_input() {
        assert!(Macd::new().calculate(&[]).is_empty());
    }

    #[test]
    fn test_macd_diff_consistency() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.4).cos() * 3.0).collect();
        for output in macd.calculate(&data) {
            assert!((output.diff - (output.macd - output.signal)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stochastic_bounds() {
        let stoch = Stochastic::new();
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.9).sin() * 5.0).collect();
        let result = stoch.calculate(&data);

        assert!(!result.is_empty());
        for output in &result {
            assert!(output.k >= 0.0 && output.k <= 100.0);
            assert!(output.d >= 0.0 && output.d <= 100.0);
        }
    }

    #[test]
    fn test_stochastic_rising_series_k_is_100() {
        let stoch = Stochastic::with_periods(5, 3);
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = stoch.calculate(&data);

        // Latest value is always the window maximum on a rising series
        assert!((result.last().unwrap().k - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_flat_series_midpoint() {
        let stoch = Stochastic::with_periods(5, 3);
        let data = vec![42.0; 20];
        let result = stoch.calculate(&data);

        assert!((result.last().unwrap().k - 50.0).abs() < 1e-10);
        assert!((result.last().unwrap().d - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_wilder_smooth_length() {
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(wilder_smooth(&values, 14).len(), 7);
        assert!(wilder_smooth(&values[..5], 14).is_empty());
    }
}

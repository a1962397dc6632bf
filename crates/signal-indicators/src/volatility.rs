//! Volatility indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::MultiOutputIndicator;

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band (mean + k standard deviations)
    pub upper: f64,
    /// Middle band (rolling mean)
    pub middle: f64,
    /// Lower band (mean - k standard deviations)
    pub lower: f64,
}

/// Bollinger Bands.
///
/// Rolling mean with upper and lower bands at a configurable number of
/// standard deviations, forming a volatility envelope.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create Bollinger Bands with the conventional parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if data.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        let mut result = Vec::with_capacity(data.len() - self.period + 1);

        for window in data.windows(self.period) {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 =
                window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            let band = self.std_dev_multiplier * variance.sqrt();

            result.push(BollingerOutput {
                upper: mean + band,
                middle: mean,
                lower: mean - band,
            });
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ordering() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.5).sin() * 3.0).collect();
        let result = bb.calculate(&data);

        assert!(!result.is_empty());
        for output in &result {
            assert!(output.upper >= output.middle);
            assert!(output.middle >= output.lower);
        }
    }

    #[test]
    fn test_flat_series_collapses_bands() {
        let bb = BollingerBands::with_params(5, 2.0);
        let data = vec![50.0; 12];
        let result = bb.calculate(&data);

        for output in &result {
            assert!((output.upper - 50.0).abs() < 1e-10);
            assert!((output.middle - 50.0).abs() < 1e-10);
            assert!((output.lower - 50.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_output_length() {
        let bb = BollingerBands::with_params(20, 2.0);
        let data: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_eq!(bb.calculate(&data).len(), 50 - 19);
    }

    #[test]
    fn test_insufficient_data() {
        let bb = BollingerBands::with_params(20, 2.0);
        assert!(bb.calculate(&[1.0; 10]).is_empty());
    }
}

//! Trend-strength indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::MultiOutputIndicator;

use crate::momentum::wilder_smooth;

/// ADX output with its directional components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxOutput {
    /// Average Directional Index, [0, 100]
    pub adx: f64,
    /// Positive directional indicator (+DI)
    pub plus_di: f64,
    /// Negative directional indicator (-DI)
    pub minus_di: f64,
}

/// Average Directional Index (Wilder).
///
/// Steps: directional movement (+DM/-DM) from consecutive values,
/// Wilder-smoothed alongside the true range; +DI/-DI as smoothed DM
/// over smoothed TR; DX from the DI spread; ADX as Wilder-smoothed DX.
///
/// This implementation takes a single price series standing in for
/// high, low and close, for feeds without OHLC aggregation. The true
/// range then degenerates to the absolute one-step price change and
/// +DM/-DM to its positive and negative parts.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator. The conventional period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl MultiOutputIndicator for Adx {
    type Outputs = AdxOutput;

    fn calculate(&self, data: &[f64]) -> Vec<AdxOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let steps = data.len() - 1;
        let mut plus_dm = Vec::with_capacity(steps);
        let mut minus_dm = Vec::with_capacity(steps);
        let mut tr = Vec::with_capacity(steps);

        for pair in data.windows(2) {
            let change = pair[1] - pair[0];
            plus_dm.push(change.max(0.0));
            minus_dm.push((-change).max(0.0));
            tr.push(change.abs());
        }

        let smooth_tr = wilder_smooth(&tr, self.period);
        let smooth_plus = wilder_smooth(&plus_dm, self.period);
        let smooth_minus = wilder_smooth(&minus_dm, self.period);

        let mut plus_di = Vec::with_capacity(smooth_tr.len());
        let mut minus_di = Vec::with_capacity(smooth_tr.len());
        let mut dx = Vec::with_capacity(smooth_tr.len());

        for i in 0..smooth_tr.len() {
            // A flat window has zero smoothed range; report zero
            // directional strength rather than an undefined ratio.
            let (p, m) = if smooth_tr[i] == 0.0 {
                (0.0, 0.0)
            } else {
                (
                    100.0 * smooth_plus[i] / smooth_tr[i],
                    100.0 * smooth_minus[i] / smooth_tr[i],
                )
            };
            plus_di.push(p);
            minus_di.push(m);

            let di_sum = p + m;
            dx.push(if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (p - m).abs() / di_sum
            });
        }

        let adx = wilder_smooth(&dx, self.period);

        // Zip the ADX tail with the matching DI tail
        let offset = plus_di.len() - adx.len();
        adx.iter()
            .enumerate()
            .map(|(i, &adx)| AdxOutput {
                adx,
                plus_di: plus_di[offset + i],
                minus_di: minus_di[offset + i],
            })
            .collect()
    }

    fn period(&self) -> usize {
        2 * self.period
    }

    fn name(&self) -> &str {
        "ADX"
    }
}

// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the closes in each window. The Band Width (BBW) is the normalised
// distance: BBW = (upper - lower) / middle * 100.

use serde::Serialize;

use crate::indicators::sma::sma_of;
use crate::indicators::Series;
use crate::types::{closes, Bar};

pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_STD_DEV: f64 = 2.0;

/// Full band series, all sharing the SMA anchor `period - 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Latest band values plus Band Width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerSnapshot {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// `(upper - lower) / middle * 100`; absent when the middle band is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl BollingerBands {
    /// Most recent band values, `None` when the bands are empty.
    pub fn latest(&self) -> Option<BollingerSnapshot> {
        let upper = self.upper.latest()?;
        let middle = self.middle.latest()?;
        let lower = self.lower.latest()?;

        Some(BollingerSnapshot {
            upper,
            middle,
            lower,
            width: (middle != 0.0).then(|| (upper - lower) / middle * 100.0),
        })
    }
}

/// Calculate Bollinger Bands over the closes of `bars`.
///
/// All three series are empty when `bars.len() < period` or `period == 0`.
pub fn calculate_bollinger(bars: &[Bar], period: usize, num_std: f64) -> BollingerBands {
    let values = closes(bars);
    let start = period.saturating_sub(1);
    let middle = sma_of(&values, period);

    let period_f = period as f64;
    let (upper, lower): (Vec<f64>, Vec<f64>) = middle
        .iter()
        .zip(values.windows(period.max(1)))
        .map(|(&mean, window)| {
            let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f;
            let std_dev = variance.sqrt();
            (mean + num_std * std_dev, mean - num_std * std_dev)
        })
        .unzip();

    BollingerBands {
        upper: Series::new(start, upper),
        middle: Series::new(start, middle),
        lower: Series::new(start, lower),
    }
}

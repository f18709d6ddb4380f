// =============================================================================
// Indicator Panel — every series a chart layer plots for one bar series
// =============================================================================

use serde::Serialize;

use crate::indicators::bollinger::{calculate_bollinger, BollingerBands, BollingerSnapshot};
use crate::indicators::ema::calculate_ema;
use crate::indicators::macd::{calculate_macd, MacdResult};
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::indicators::Series;
use crate::signals::SignalParams;
use crate::types::Bar;

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorPanel {
    pub bar_count: usize,
    pub sma_short: Series,
    pub sma_long: Series,
    pub ema_fast: Series,
    pub ema_slow: Series,
    pub rsi: Series,
    pub macd: MacdResult,
    pub bollinger: BollingerBands,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_latest: Option<BollingerSnapshot>,
}

/// Compute the full panel using the periods in `params`.
///
/// Series whose minimum length is not met come back empty; the panel itself
/// is always produced.
pub fn compute_panel(bars: &[Bar], params: &SignalParams) -> IndicatorPanel {
    let macd_params = params.macd();
    let bollinger = calculate_bollinger(bars, params.bollinger_period, params.bollinger_std_dev);
    let bollinger_latest = bollinger.latest();

    IndicatorPanel {
        bar_count: bars.len(),
        sma_short: calculate_sma(bars, params.ma_short),
        sma_long: calculate_sma(bars, params.ma_long),
        ema_fast: calculate_ema(bars, macd_params.fast),
        ema_slow: calculate_ema(bars, macd_params.slow),
        rsi: calculate_rsi(bars, params.rsi_period),
        macd: calculate_macd(bars, macd_params),
        bollinger,
        bollinger_latest,
    }
}

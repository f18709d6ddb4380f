// =============================================================================
// Price Momentum — last-bar change used by the price card and the scorer
// =============================================================================

use serde::Serialize;

use crate::types::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceMomentum {
    pub previous_close: f64,
    pub close: f64,
    pub change: f64,
    /// Percent change versus the previous close; 0 when that close is 0.
    pub change_percent: f64,
}

/// Close-to-close change between the last two bars.
///
/// Returns `None` with fewer than two bars.
pub fn price_momentum(bars: &[Bar]) -> Option<PriceMomentum> {
    let [.., previous, last] = bars else {
        return None;
    };

    let change = last.close - previous.close;
    let change_percent = if previous.close == 0.0 {
        0.0
    } else {
        change / previous.close * 100.0
    };

    Some(PriceMomentum {
        previous_close: previous.close,
        close: last.close,
        change,
        change_percent,
    })
}

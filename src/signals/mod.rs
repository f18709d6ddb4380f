// =============================================================================
// Signals Module
// =============================================================================
//
// From indicator series to a trading verdict:
// - Signal generation (RSI, MACD, moving-average stack)
// - Last-bar price momentum
// - Composite recommendation scoring (action, tier, confidence, risk)

pub mod generator;
pub mod momentum;
pub mod recommendation;

pub use generator::{generate_signals, generate_signals_with, SignalParams};
pub use momentum::{price_momentum, PriceMomentum};
pub use recommendation::{
    fallback_recommendation, recommend, recommend_with, MIN_RECOMMENDATION_BARS,
};

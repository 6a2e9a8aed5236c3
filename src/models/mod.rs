//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{MarketIndicators, RegressionZone, TrendState};
pub use signal::{TradeAction, TradeSignal};

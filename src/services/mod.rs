//! External market data collaborators.

pub mod ahr999;
pub mod binance;
pub mod market_data;

pub use binance::BinanceCollector;
pub use market_data::{CollectorError, IndicatorSource, StaticIndicatorSource};

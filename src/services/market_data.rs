//! Market data source interface feeding the signal pipeline.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::indicators::MarketIndicators;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode market data: {0}")]
    Decode(String),

    #[error("insufficient market data: {0}")]
    InsufficientData(String),
}

#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Collect a fresh snapshot. `leverage` is the operator-supplied account
    /// leverage, carried through unchanged.
    async fn fetch_indicators(&self, leverage: f64) -> Result<MarketIndicators, CollectorError>;
}

/// Always returns the same snapshot (with the requested leverage applied).
/// Useful for dry runs and tests.
pub struct StaticIndicatorSource {
    indicators: MarketIndicators,
}

impl StaticIndicatorSource {
    pub fn new(indicators: MarketIndicators) -> Self {
        Self { indicators }
    }
}

#[async_trait]
impl IndicatorSource for StaticIndicatorSource {
    async fn fetch_indicators(&self, leverage: f64) -> Result<MarketIndicators, CollectorError> {
        Ok(self.indicators.clone().with_leverage(leverage))
    }
}

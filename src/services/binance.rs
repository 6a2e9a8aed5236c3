//! Binance spot market data collector

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use super::ahr999;
use super::market_data::{CollectorError, IndicatorSource};
use crate::models::indicators::{MarketIndicators, RegressionZone, TrendState};

pub const DEFAULT_API_URL: &str = "https://api.binance.com";
pub const SOURCE: &str = "Binance";

/// MVRV-Z has no free feed; a mid-range value keeps the HOLD blend neutral.
pub const PLACEHOLDER_MVRV_Z: f64 = 2.5;

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

pub struct BinanceCollector {
    client: reqwest::Client,
    base_url: String,
}

impl BinanceCollector {
    pub fn new() -> Self {
        Self::with_client(DEFAULT_API_URL, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Daily closes, oldest first.
    pub async fn daily_closes(&self, symbol: &str, limit: usize) -> Result<Vec<f64>, CollectorError> {
        let rows: Vec<Vec<serde_json::Value>> = self
            .client
            .get(format!("{}/api/v3/klines", self.base_url))
            .query(&[
                ("symbol", symbol.to_string()),
                ("interval", "1d".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        rows.iter()
            .map(|row| {
                row.get(4)
                    .and_then(|close| close.as_str())
                    .and_then(|close| close.parse::<f64>().ok())
                    .ok_or_else(|| CollectorError::Decode(format!("malformed kline row: {:?}", row)))
            })
            .collect()
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<f64, CollectorError> {
        let ticker: TickerPrice = self
            .client
            .get(format!("{}/api/v3/ticker/price", self.base_url))
            .query(&[("symbol", symbol)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        ticker
            .price
            .parse()
            .map_err(|e| CollectorError::Decode(format!("bad price '{}': {}", ticker.price, e)))
    }
}

impl Default for BinanceCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Placeholder for the 2-year MA multiplier until a real feed exists.
pub fn trend_from_price(price_btc: f64) -> TrendState {
    if price_btc <= 0.0 {
        TrendState::Normal
    } else if price_btc < 20_000.0 {
        TrendState::BearBottom
    } else if price_btc > 150_000.0 {
        TrendState::BullTop
    } else {
        TrendState::Normal
    }
}

/// Placeholder for the ETH log regression channel.
pub fn eth_zone_from_price(price_eth: f64) -> RegressionZone {
    if price_eth <= 0.0 {
        RegressionZone::Unknown
    } else if price_eth < 2_000.0 {
        RegressionZone::Lower
    } else if price_eth > 5_000.0 {
        RegressionZone::Upper
    } else {
        RegressionZone::Middle
    }
}

#[async_trait]
impl IndicatorSource for BinanceCollector {
    async fn fetch_indicators(&self, leverage: f64) -> Result<MarketIndicators, CollectorError> {
        let now = Utc::now();

        let closes = self.daily_closes("BTCUSDT", ahr999::WINDOW_DAYS).await?;
        let valuation_index = ahr999::calculate(&closes, now)?;
        let price_btc = closes.last().copied().unwrap_or(0.0);

        // A missing ETH price degrades the report, it does not abort the cycle.
        let price_eth = match self.ticker_price("ETHUSDT").await {
            Ok(price) => price,
            Err(e) => {
                warn!(error = %e, "Failed to fetch ETH price, marking as unavailable");
                0.0
            }
        };

        debug!(
            valuation_index,
            price_btc,
            price_eth,
            "Collected Binance indicators"
        );

        Ok(MarketIndicators::new(now, valuation_index)
            .with_mvrv_z_score(PLACEHOLDER_MVRV_Z)
            .with_prices(price_btc, price_eth)
            .with_trend(trend_from_price(price_btc))
            .with_pi_cycle_cross(false)
            .with_eth_zone(eth_zone_from_price(price_eth))
            .with_leverage(leverage)
            .with_source(SOURCE))
    }
}

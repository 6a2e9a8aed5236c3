use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of ETH's price inside its long-run log regression channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegressionZone {
    Lower,
    Middle,
    Upper,
    Unknown,
}

/// Long-horizon trend state derived from the 2-year moving-average multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendState {
    BearBottom,
    Normal,
    BullTop,
}

/// One cycle's worth of market indicators.
///
/// Built once by an [`IndicatorSource`](crate::services::market_data::IndicatorSource)
/// and only read afterwards. Prices of `0.0` mean "unavailable".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndicators {
    pub timestamp: DateTime<Utc>,
    /// Primary valuation index (AHR999). Lower is cheaper.
    pub valuation_index: f64,
    /// Secondary overheating score (MVRV-Z). May be negative.
    pub mvrv_z_score: f64,
    pub price_btc: f64,
    pub price_eth: f64,
    pub eth_regression_zone: RegressionZone,
    pub trend_state: TrendState,
    pub pi_cycle_cross: bool,
    pub account_leverage: f64,
    pub source: String,
}

impl MarketIndicators {
    /// Neutral snapshot: every override off, prices unavailable.
    pub fn new(timestamp: DateTime<Utc>, valuation_index: f64) -> Self {
        Self {
            timestamp,
            valuation_index,
            mvrv_z_score: 0.0,
            price_btc: 0.0,
            price_eth: 0.0,
            eth_regression_zone: RegressionZone::Unknown,
            trend_state: TrendState::Normal,
            pi_cycle_cross: false,
            account_leverage: 1.0,
            source: String::new(),
        }
    }

    pub fn with_mvrv_z_score(mut self, score: f64) -> Self {
        self.mvrv_z_score = score;
        self
    }

    /// Negative prices are clamped to the unavailable sentinel.
    pub fn with_prices(mut self, btc: f64, eth: f64) -> Self {
        self.price_btc = btc.max(0.0);
        self.price_eth = eth.max(0.0);
        self
    }

    pub fn with_eth_zone(mut self, zone: RegressionZone) -> Self {
        self.eth_regression_zone = zone;
        self
    }

    pub fn with_trend(mut self, trend: TrendState) -> Self {
        self.trend_state = trend;
        self
    }

    pub fn with_pi_cycle_cross(mut self, crossed: bool) -> Self {
        self.pi_cycle_cross = crossed;
        self
    }

    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.account_leverage = leverage.max(0.0);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// True when either topping indicator says the cycle is peaking.
    pub fn escape_signal(&self) -> bool {
        self.pi_cycle_cross || self.trend_state == TrendState::BullTop
    }
}

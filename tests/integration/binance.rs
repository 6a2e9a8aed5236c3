//! Integration tests for the Binance collector

use crate::test_utils::kline_rows;
use chrono::Utc;
use sentinel::models::indicators::{RegressionZone, TrendState};
use sentinel::services::ahr999;
use sentinel::services::binance::{BinanceCollector, PLACEHOLDER_MVRV_Z, SOURCE};
use sentinel::services::market_data::{CollectorError, IndicatorSource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_klines(server: &MockServer, close: f64, count: usize) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1d"))
        .and(query_param("limit", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kline_rows(count, close)))
        .mount(server)
        .await;
}

async fn mock_eth_ticker(server: &MockServer, price: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "ETHUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "ETHUSDT",
            "price": price,
        })))
        .mount(server)
        .await;
}

fn collector(server: &MockServer) -> BinanceCollector {
    BinanceCollector::with_client(server.uri(), reqwest::Client::new())
}

#[tokio::test]
async fn collects_full_snapshot() {
    let server = MockServer::start().await;
    mock_klines(&server, 60_000.0, 200).await;
    mock_eth_ticker(&server, "3150.25000000").await;

    let indicators = collector(&server).fetch_indicators(1.3).await.unwrap();

    let expected = ahr999::calculate(&[60_000.0; 200], Utc::now()).unwrap();
    assert!((indicators.valuation_index - expected).abs() < 1e-6);
    assert_eq!(indicators.price_btc, 60_000.0);
    assert_eq!(indicators.price_eth, 3150.25);
    assert_eq!(indicators.account_leverage, 1.3);
    assert_eq!(indicators.mvrv_z_score, PLACEHOLDER_MVRV_Z);
    assert_eq!(indicators.trend_state, TrendState::Normal);
    assert_eq!(indicators.eth_regression_zone, RegressionZone::Middle);
    assert!(!indicators.pi_cycle_cross);
    assert_eq!(indicators.source, SOURCE);
}

#[tokio::test]
async fn missing_eth_price_degrades_to_unknown() {
    let server = MockServer::start().await;
    mock_klines(&server, 18_000.0, 200).await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let indicators = collector(&server).fetch_indicators(1.0).await.unwrap();

    assert_eq!(indicators.price_eth, 0.0);
    assert_eq!(indicators.eth_regression_zone, RegressionZone::Unknown);
    assert_eq!(indicators.trend_state, TrendState::BearBottom);
}

#[tokio::test]
async fn short_kline_history_fails_collection() {
    let server = MockServer::start().await;
    mock_klines(&server, 60_000.0, 50).await;
    mock_eth_ticker(&server, "3000").await;

    let err = collector(&server).fetch_indicators(1.0).await.unwrap_err();
    assert!(matches!(err, CollectorError::InsufficientData(_)));
}

#[tokio::test]
async fn kline_endpoint_failure_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = collector(&server).fetch_indicators(1.0).await.unwrap_err();
    assert!(matches!(err, CollectorError::Http(_)));
}

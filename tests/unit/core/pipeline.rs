//! Unit tests for the report pipeline

use crate::mock_transport::ScriptedTransport;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sentinel::core::pipeline::{CycleOutcome, ReportPipeline};
use sentinel::delivery::{CommandHandler, DeliveryConfig, DeliveryService};
use sentinel::models::indicators::{MarketIndicators, RegressionZone};
use sentinel::report::ReportRenderer;
use sentinel::services::market_data::{CollectorError, IndicatorSource, StaticIndicatorSource};
use sentinel::signals::engine::SignalEngine;
use std::sync::Arc;

struct FailingSource;

#[async_trait]
impl IndicatorSource for FailingSource {
    async fn fetch_indicators(&self, _leverage: f64) -> Result<MarketIndicators, CollectorError> {
        Err(CollectorError::InsufficientData("exchange unreachable".to_string()))
    }
}

fn static_source(valuation_index: f64) -> Arc<dyn IndicatorSource> {
    let indicators = MarketIndicators::new(Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(), valuation_index)
        .with_prices(80_000.0, 1_800.0)
        .with_eth_zone(RegressionZone::Lower);
    Arc::new(StaticIndicatorSource::new(indicators))
}

fn pipeline(source: Arc<dyn IndicatorSource>, transport: Arc<ScriptedTransport>) -> ReportPipeline {
    let delivery = DeliveryService::new(transport, DeliveryConfig::new(42, "/advice"));
    ReportPipeline::new(source, SignalEngine::default(), ReportRenderer::default(), delivery)
        .with_max_send_attempts(3)
}

#[tokio::test]
async fn test_cycle_delivers_rendered_report() {
    let transport = Arc::new(ScriptedTransport::new());
    let outcome = pipeline(static_source(0.3), transport.clone()).run_cycle().await;

    assert_eq!(outcome, CycleOutcome::Delivered);
    let sent = transport.sent_messages();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Accumulation zone"));
    assert!(sent[0].contains("💪 Buy BTC heavily"));
}

#[tokio::test]
async fn test_configured_leverage_reaches_the_engine() {
    let transport = Arc::new(ScriptedTransport::new());
    let outcome = pipeline(static_source(0.3), transport.clone())
        .with_leverage(2.0)
        .run_cycle()
        .await;

    assert_eq!(outcome, CycleOutcome::Delivered);
    assert!(transport.sent_messages()[0].contains("⛔️ Stop all activity"));
}

#[tokio::test]
async fn test_collection_failure_sends_nothing() {
    let transport = Arc::new(ScriptedTransport::new());
    let outcome = pipeline(Arc::new(FailingSource), transport.clone()).run_cycle().await;

    assert_eq!(outcome, CycleOutcome::CollectionFailed);
    assert_eq!(transport.send_attempts(), 0);
}

#[tokio::test]
async fn test_delivery_failure_uses_full_attempt_budget() {
    let transport = Arc::new(ScriptedTransport::always_failing());
    let outcome = pipeline(static_source(0.9), transport.clone()).run_cycle().await;

    assert_eq!(outcome, CycleOutcome::DeliveryFailed);
    assert_eq!(transport.send_attempts(), 3);
}

#[tokio::test]
async fn test_command_reruns_the_cycle() {
    let transport = Arc::new(ScriptedTransport::new());
    let pipeline = pipeline(static_source(0.9), transport.clone());

    pipeline.on_command().await;
    pipeline.on_command().await;

    assert_eq!(transport.sent_messages().len(), 2);
    assert_eq!(transport.sent_messages()[0], transport.sent_messages()[1]);
}

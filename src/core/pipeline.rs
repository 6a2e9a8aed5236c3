//! One evaluate-and-send cycle: collect → evaluate → render → deliver.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::delivery::listener::CommandHandler;
use crate::delivery::service::DeliveryService;
use crate::report::ReportRenderer;
use crate::services::market_data::IndicatorSource;
use crate::signals::engine::SignalEngine;

/// Outcome of a single cycle, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Delivered,
    CollectionFailed,
    DeliveryFailed,
}

/// Holds no mutable state, so the scheduler and the command listener can
/// both run cycles through a shared `Arc`.
pub struct ReportPipeline {
    source: Arc<dyn IndicatorSource>,
    engine: SignalEngine,
    renderer: ReportRenderer,
    delivery: DeliveryService,
    leverage: f64,
    max_send_attempts: usize,
}

impl ReportPipeline {
    pub fn new(
        source: Arc<dyn IndicatorSource>,
        engine: SignalEngine,
        renderer: ReportRenderer,
        delivery: DeliveryService,
    ) -> Self {
        Self {
            source,
            engine,
            renderer,
            delivery,
            leverage: 1.0,
            max_send_attempts: 3,
        }
    }

    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.leverage = leverage;
        self
    }

    pub fn with_max_send_attempts(mut self, attempts: usize) -> Self {
        self.max_send_attempts = attempts;
        self
    }

    /// Run a full cycle. Failures are logged; they never reach the recipient.
    pub async fn run_cycle(&self) -> CycleOutcome {
        info!("Running evaluation cycle");

        let indicators = match self.source.fetch_indicators(self.leverage).await {
            Ok(indicators) => indicators,
            Err(e) => {
                error!(error = %e, "Failed to collect market indicators, skipping cycle");
                return CycleOutcome::CollectionFailed;
            }
        };
        info!(
            valuation_index = indicators.valuation_index,
            price_btc = indicators.price_btc,
            source = %indicators.source,
            "Collected market indicators"
        );

        let signal = self.engine.evaluate(&indicators);
        info!(
            action_btc = ?signal.action_btc,
            action_eth = ?signal.action_eth,
            halted = signal.halted,
            amount_multiplier = signal.amount_multiplier,
            "Signal evaluated"
        );

        let report = self.renderer.render(&indicators, &signal);

        match self
            .delivery
            .send_with_retry(&report, self.max_send_attempts)
            .await
        {
            Ok(()) => {
                info!("Report delivered");
                CycleOutcome::Delivered
            }
            Err(e) => {
                error!(
                    error = %e,
                    attempts = self.max_send_attempts,
                    "Failed to deliver report after all attempts"
                );
                CycleOutcome::DeliveryFailed
            }
        }
    }
}

#[async_trait]
impl CommandHandler for ReportPipeline {
    async fn on_command(&self) {
        self.run_cycle().await;
    }
}

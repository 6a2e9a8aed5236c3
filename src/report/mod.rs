//! Markdown report rendering.
//!
//! Rendering is deterministic: the date comes from the snapshot timestamp,
//! so identical inputs always produce byte-identical reports.

pub mod sections;

use crate::models::indicators::MarketIndicators;
use crate::models::signal::TradeSignal;
use crate::signals::bands::SafetyThresholds;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    thresholds: SafetyThresholds,
}

impl ReportRenderer {
    pub fn new(thresholds: SafetyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn render(&self, indicators: &MarketIndicators, signal: &TradeSignal) -> String {
        let date = indicators.timestamp.format("%Y-%m-%d");

        format!(
            "🛡️ *Sentinel {}*\n\n\
             📊 *Macro tone: {}*\n\n\
             {}\n\n\
             {}\n\n\
             {}\n\n\
             {}\n\n\
             {}\n\n\
             ---------------------\n\
             {}",
            date,
            sections::macro_tone(signal),
            sections::price_section(indicators),
            sections::valuation_section(indicators.valuation_index),
            sections::mvrv_section(indicators.mvrv_z_score),
            sections::eth_section(indicators.eth_regression_zone),
            sections::safety_section(indicators, &self.thresholds),
            sections::action_section(signal),
        )
    }
}

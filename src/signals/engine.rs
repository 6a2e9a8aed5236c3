//! Main signal evaluation engine: safety overrides first, then valuation bands.

use crate::models::indicators::{MarketIndicators, RegressionZone};
use crate::models::signal::{TradeAction, TradeSignal};
use crate::signals::bands::{MvrvBands, SafetyThresholds, ValuationBand, ValuationBands};

#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEngine {
    thresholds: SafetyThresholds,
}

impl SignalEngine {
    pub fn new(thresholds: SafetyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> SafetyThresholds {
        self.thresholds
    }

    /// Evaluate a snapshot. Total: every well-formed snapshot yields a signal.
    ///
    /// Priority: leverage halt, then the escape override, then the AHR999
    /// bands. The ETH action is derived independently of that chain.
    pub fn evaluate(&self, indicators: &MarketIndicators) -> TradeSignal {
        let action_eth = Self::eth_action(indicators.eth_regression_zone);

        if self.thresholds.should_halt(indicators.account_leverage) {
            return TradeSignal::halt(action_eth);
        }

        if indicators.escape_signal() {
            return TradeSignal::sell_alert(action_eth);
        }

        let band = ValuationBands::classify(indicators.valuation_index);
        let action_btc = match band {
            ValuationBand::Accumulate => TradeAction::StrongBuy,
            ValuationBand::Dca => TradeAction::DcaBuy,
            ValuationBand::Hold if indicators.mvrv_z_score >= MvrvBands::CAUTION => {
                TradeAction::HoldCaution
            }
            ValuationBand::Hold => TradeAction::Hold,
            ValuationBand::Escape => TradeAction::Sell,
        };

        TradeSignal {
            action_btc,
            action_eth,
            halted: false,
            amount_multiplier: band.amount_multiplier(),
        }
    }

    fn eth_action(zone: RegressionZone) -> TradeAction {
        match zone {
            RegressionZone::Lower => TradeAction::DcaBuy,
            RegressionZone::Upper => TradeAction::Sell,
            // Unknown is annotated as insufficient data by the renderer.
            RegressionZone::Middle | RegressionZone::Unknown => TradeAction::Hold,
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    StrongBuy,
    DcaBuy,
    Hold,
    HoldCaution,
    Sell,
    SellAlert,
    Halt,
}

/// Recommendation for the current cycle. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub action_btc: TradeAction,
    pub action_eth: TradeAction,
    pub halted: bool,
    /// Multiple of the baseline buy amount. `0.0` deploys nothing.
    pub amount_multiplier: f64,
}

impl TradeSignal {
    /// Leverage circuit breaker: nothing is deployed.
    pub fn halt(action_eth: TradeAction) -> Self {
        Self {
            action_btc: TradeAction::Halt,
            action_eth,
            halted: true,
            amount_multiplier: 0.0,
        }
    }

    /// Market-top escape: stop buying and prepare to exit.
    pub fn sell_alert(action_eth: TradeAction) -> Self {
        Self {
            action_btc: TradeAction::SellAlert,
            action_eth,
            halted: true,
            amount_multiplier: 0.0,
        }
    }

    pub fn deploys_capital(&self) -> bool {
        self.amount_multiplier > 0.0
    }
}

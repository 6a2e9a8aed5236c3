//! Individual report sections. Each returns a Telegram-Markdown fragment.

use crate::models::indicators::{MarketIndicators, RegressionZone, TrendState};
use crate::models::signal::{TradeAction, TradeSignal};
use crate::signals::bands::{
    LeverageStatus, MvrvBand, MvrvBands, SafetyThresholds, ValuationBand, ValuationBands,
};

pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// `(from - to) / reference * 100`, rounded to the nearest integer.
pub fn distance_pct(from: f64, to: f64, reference: f64) -> i64 {
    ((from - to) / reference * 100.0).round() as i64
}

pub fn macro_tone(signal: &TradeSignal) -> &'static str {
    if signal.halted {
        if signal.action_btc == TradeAction::SellAlert {
            return "🔴 Topping alert";
        }
        return "⚠️ Circuit breaker";
    }

    match signal.action_btc {
        TradeAction::StrongBuy => "🟢 Greedy accumulation",
        TradeAction::DcaBuy => "🟢 Good time to DCA",
        TradeAction::Hold | TradeAction::HoldCaution => "🟡 Hold and watch",
        TradeAction::Sell => "🔴 Scale out",
        TradeAction::SellAlert | TradeAction::Halt => "🟡 Neutral",
    }
}

fn format_price(price: f64) -> String {
    if price > 0.0 {
        format!("`${:.2}`", price)
    } else {
        format!("_{}_", INSUFFICIENT_DATA)
    }
}

pub fn price_section(indicators: &MarketIndicators) -> String {
    format!(
        "*💲 Live prices*\n• BTC: {}\n• ETH: {}",
        format_price(indicators.price_btc),
        format_price(indicators.price_eth)
    )
}

pub fn valuation_section(value: f64) -> String {
    let (emoji, status, distance, comment) = match ValuationBands::classify(value) {
        ValuationBand::Accumulate => (
            "🟢",
            "Accumulation zone",
            format!(
                "inside accumulation, {}% below the DCA line 📈",
                distance_pct(ValuationBands::ACCUMULATE, value, ValuationBands::ACCUMULATE)
            ),
            "rare opportunity, buy heavily",
        ),
        ValuationBand::Dca => (
            "🟢",
            "DCA zone",
            format!(
                "{}% above the accumulation line 0.45 📉",
                distance_pct(value, ValuationBands::ACCUMULATE, value)
            ),
            "fair price, keep stacking",
        ),
        ValuationBand::Hold => (
            "🟡",
            "Hold zone",
            format!(
                "up {}% from the DCA line 1.20 📈",
                distance_pct(value, ValuationBands::DCA, value)
            ),
            "pause buying, let it ride",
        ),
        ValuationBand::Escape => (
            "🔴",
            "Escape zone",
            format!(
                "{}% past the escape line 5.00 🚨",
                distance_pct(value, ValuationBands::HOLD, value)
            ),
            "sell in tranches, lock in profit",
        ),
    };

    format!(
        "*1. Valuation index (AHR999)*\n\
         • Value: `{:.2}` {}\n\
         • Zone: *{}*\n\
         • Distance: {}\n\
         _(Take: {})_",
        value, emoji, status, distance, comment
    )
}

pub fn mvrv_section(score: f64) -> String {
    let (emoji, status, distance) = match MvrvBands::classify(score) {
        MvrvBand::Undervalued => (
            "🟢",
            "Deeply undervalued",
            "below the zero axis, historic bottom territory".to_string(),
        ),
        MvrvBand::Bottom => (
            "❄️",
            "Bottom range",
            format!(
                "{}% from the zero axis, close to the bottom",
                100 - distance_pct(score, MvrvBands::ZERO_AXIS, MvrvBands::BOTTOM)
            ),
        ),
        MvrvBand::Neutral => (
            "🟡",
            "Neutral range",
            "market is calm, business as usual".to_string(),
        ),
        MvrvBand::Warm => (
            "🟠",
            "Running warm",
            format!(
                "{}% left before overheated 6.0",
                100 - distance_pct(score, MvrvBands::NEUTRAL, MvrvBands::OVERHEATED - MvrvBands::NEUTRAL)
            ),
        ),
        MvrvBand::Overheated => (
            "🔴",
            "Overheated",
            "euphoria, do not chase".to_string(),
        ),
    };

    format!(
        "*2. Market temperature (MVRV-Z)*\n• Value: `{:.2}` {}\n• Status: *{}*\n• Distance: {}",
        score, emoji, status, distance
    )
}

pub fn eth_section(zone: RegressionZone) -> String {
    let (emoji, status, advice) = match zone {
        RegressionZone::Lower => ("🟢", "Undervalued", "raise the ETH allocation"),
        RegressionZone::Middle => ("🟡", "Neutral", "no active moves, follow the BTC allocation"),
        RegressionZone::Upper => ("🔴", "Overvalued", "trim ETH into BTC or stablecoins"),
        RegressionZone::Unknown => ("⚪️", "Unknown", "insufficient data, stay on the sidelines"),
    };

    format!(
        "*3. Ethereum (ETH)*\n• Zone: {} *{}*\n• Rebalance: {}",
        emoji, status, advice
    )
}

pub fn safety_section(indicators: &MarketIndicators, thresholds: &SafetyThresholds) -> String {
    let leverage_badge = match thresholds.status(indicators.account_leverage) {
        LeverageStatus::Safe => "✅",
        LeverageStatus::Warning => "⚠️ Warning",
        LeverageStatus::Danger => "❌ Danger",
    };

    let escape_badge = if indicators.pi_cycle_cross {
        "🔴 Pi cycle top cross"
    } else if indicators.trend_state == TrendState::BullTop {
        "🔴 Above the 2-year MA x5 line"
    } else {
        "⚪️ No topping risk"
    };

    format!(
        "*4. Safety check*\n• Leverage: {:.1}x {} (safe below {:.1}x)\n• Escape: {}",
        indicators.account_leverage, leverage_badge, thresholds.halt_leverage, escape_badge
    )
}

fn action_label(action: TradeAction) -> &'static str {
    match action {
        TradeAction::Halt => "⛔️ Stop all activity",
        TradeAction::SellAlert => "🚨 Prepare to exit",
        TradeAction::StrongBuy => "💪 Buy BTC heavily",
        TradeAction::DcaBuy => "📈 Buy BTC",
        TradeAction::Hold => "✋ Hold and wait",
        TradeAction::HoldCaution => "✋ Hold, market running warm",
        TradeAction::Sell => "📉 Sell in tranches",
    }
}

pub fn action_section(signal: &TradeSignal) -> String {
    let badge = if signal.amount_multiplier >= 1.5 {
        "💰💰"
    } else if signal.amount_multiplier == 0.0 {
        "🚫"
    } else {
        "💰"
    };

    format!(
        "🚀 *This week: {}*\n{} *Amount multiplier: {:.1}x*",
        action_label(signal.action_btc),
        badge,
        signal.amount_multiplier
    )
}

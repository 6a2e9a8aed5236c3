//! Decision band boundaries shared by the engine and the report renderer

/// Upper boundaries of the AHR999 valuation bands.
pub struct ValuationBands;

impl ValuationBands {
    pub const ACCUMULATE: f64 = 0.45;
    pub const DCA: f64 = 1.20;
    pub const HOLD: f64 = 5.00;

    /// Band membership is `< upper`, so a value sitting on a boundary
    /// lands in the more cautious band above it.
    pub fn classify(value: f64) -> ValuationBand {
        if value < Self::ACCUMULATE {
            ValuationBand::Accumulate
        } else if value < Self::DCA {
            ValuationBand::Dca
        } else if value < Self::HOLD {
            ValuationBand::Hold
        } else {
            ValuationBand::Escape
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationBand {
    Accumulate,
    Dca,
    Hold,
    Escape,
}

impl ValuationBand {
    pub fn amount_multiplier(self) -> f64 {
        match self {
            ValuationBand::Accumulate => 1.5,
            ValuationBand::Dca => 1.0,
            ValuationBand::Hold | ValuationBand::Escape => 0.0,
        }
    }
}

/// MVRV-Z score boundaries.
pub struct MvrvBands;

impl MvrvBands {
    pub const ZERO_AXIS: f64 = 0.0;
    pub const BOTTOM: f64 = 1.0;
    pub const NEUTRAL: f64 = 3.0;
    pub const OVERHEATED: f64 = 6.0;

    /// Hold-band blend: a warm market turns HOLD into HOLD_CAUTION.
    pub const CAUTION: f64 = Self::NEUTRAL;

    pub fn classify(score: f64) -> MvrvBand {
        if score < Self::ZERO_AXIS {
            MvrvBand::Undervalued
        } else if score < Self::BOTTOM {
            MvrvBand::Bottom
        } else if score < Self::NEUTRAL {
            MvrvBand::Neutral
        } else if score < Self::OVERHEATED {
            MvrvBand::Warm
        } else {
            MvrvBand::Overheated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MvrvBand {
    Undervalued,
    Bottom,
    Neutral,
    Warm,
    Overheated,
}

/// Account leverage thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyThresholds {
    /// Strictly above this the engine halts all buying.
    pub halt_leverage: f64,
    /// From here up the report shows a warning badge.
    pub warning_leverage: f64,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            halt_leverage: 1.5,
            warning_leverage: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverageStatus {
    Safe,
    Warning,
    Danger,
}

impl SafetyThresholds {
    pub fn should_halt(&self, leverage: f64) -> bool {
        leverage > self.halt_leverage
    }

    pub fn status(&self, leverage: f64) -> LeverageStatus {
        if leverage >= self.halt_leverage {
            LeverageStatus::Danger
        } else if leverage >= self.warning_leverage {
            LeverageStatus::Warning
        } else {
            LeverageStatus::Safe
        }
    }
}

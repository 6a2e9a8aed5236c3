//! AHR999 valuation index.
//!
//! `ahr999 = (price / 200-day geometric mean) * (price / fitted growth price)`
//! where the fitted price is `10^(5.84 * log10(coin age in days) - 17.01)`.

use chrono::{DateTime, NaiveDate, Utc};

use super::market_data::CollectorError;

pub const WINDOW_DAYS: usize = 200;

fn genesis() -> NaiveDate {
    // 2009-01-03 is always a valid date.
    NaiveDate::from_ymd_opt(2009, 1, 3).unwrap_or(NaiveDate::MIN)
}

pub fn coin_age_days(at: DateTime<Utc>) -> f64 {
    let days = (at.date_naive() - genesis()).num_days();
    days.max(1) as f64
}

pub fn fitted_price(age_days: f64) -> f64 {
    10f64.powf(5.84 * age_days.log10() - 17.01)
}

pub fn geometric_mean(values: &[f64]) -> f64 {
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Compute the index from daily closes (oldest first). Uses the last
/// [`WINDOW_DAYS`] closes; the final close is the current price.
pub fn calculate(closes: &[f64], at: DateTime<Utc>) -> Result<f64, CollectorError> {
    if closes.len() < WINDOW_DAYS {
        return Err(CollectorError::InsufficientData(format!(
            "need {} daily closes, got {}",
            WINDOW_DAYS,
            closes.len()
        )));
    }

    let window = &closes[closes.len() - WINDOW_DAYS..];
    if window.iter().any(|c| !c.is_finite() || *c <= 0.0) {
        return Err(CollectorError::InsufficientData(
            "non-positive close in window".to_string(),
        ));
    }

    let price = window[WINDOW_DAYS - 1];
    let cost_basis = geometric_mean(window);
    let fitted = fitted_price(coin_age_days(at));

    Ok((price / cost_basis) * (price / fitted))
}

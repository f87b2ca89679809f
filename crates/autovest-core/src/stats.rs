//! Statistical primitives shared by the scorers
//!
//! All helpers are total: empty input yields 0 rather than an error, and
//! division by a zero mean is guarded.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::models::{RoundUpCap, Transaction};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N), 0 for an empty slice
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let squared_diffs: Vec<f64> = values.iter().map(|v| (v - avg).powi(2)).collect();
    mean(&squared_diffs).sqrt()
}

/// Standard deviation over mean; 0 when the mean is 0
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg == 0.0 {
        return 0.0;
    }
    standard_deviation(values) / avg
}

/// Clamp into [min, max] without rounding
pub fn clamp_score(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Clamp into the 0-100 score range
pub fn normalize_score(value: f64) -> f64 {
    clamp_score(value, 0.0, 100.0)
}

/// Normalize then round to a whole score
pub fn round_score(value: f64) -> u8 {
    normalize_score(value).round() as u8
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Midnight UTC at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Absolute whole-day difference, rounded up; symmetric in its arguments
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let millis = (b - a).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Total spending per calendar month, in chronological order
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<f64> {
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for tx in transactions {
        *totals.entry((tx.date.year(), tx.date.month())).or_default() += tx.amount;
    }
    totals.into_values().collect()
}

/// Spare change left when rounding `amount` up to the next multiple of `cap`
///
/// Rounded to cents. Exactly 0 when the amount is already a multiple, and
/// always strictly below the cap.
pub fn calculate_spare_change(amount: f64, cap: RoundUpCap) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }

    let cap = cap.value();
    let rounded_up = (amount / cap).ceil() * cap;
    let spare = round_to_cents(rounded_up - amount);

    // A cent-level float residue can land on either side of a multiple
    if spare <= 0.0 || spare >= cap {
        0.0
    } else {
        spare
    }
}

/// Spare change summed over a set of transactions, rounded to cents
pub fn total_spare_change(transactions: &[Transaction], cap: RoundUpCap) -> f64 {
    round_to_cents(
        transactions
            .iter()
            .map(|tx| calculate_spare_change(tx.amount, cap))
            .sum(),
    )
}

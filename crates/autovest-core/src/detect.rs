//! Subscription detection
//!
//! Infers subscriptions from transactions the caller flagged as recurring:
//! - Groups charges by exact (case-sensitive) merchant name
//! - Needs at least two charges per merchant to see a pattern
//! - Classifies billing frequency from the average gap between charges
//!
//! `detected_pattern` is a saturating heuristic (30 points per charge, capped
//! at 100), not a statistical confidence.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use tracing::debug;

use crate::models::{Frequency, Subscription, Transaction};
use crate::stats::{days_between, mean, start_of_day};

/// Minimum recurring charges from one merchant before it counts as a subscription
pub const MIN_OCCURRENCES: usize = 2;

const CONFIDENCE_PER_CHARGE: u32 = 30;
const MAX_CONFIDENCE: u32 = 100;

/// Detect subscriptions among recurring-flagged transactions
///
/// Merchants are returned in order of their first appearance in `transactions`.
/// `as_of` is the evaluation time used for `days_since_last_use`.
pub fn detect_subscriptions(
    transactions: &[Transaction],
    as_of: DateTime<Utc>,
) -> Vec<Subscription> {
    let mut merchants: Vec<&str> = Vec::new();
    let mut by_merchant: HashMap<&str, Vec<&Transaction>> = HashMap::new();

    for tx in transactions.iter().filter(|tx| tx.is_recurring) {
        by_merchant
            .entry(tx.merchant.as_str())
            .or_insert_with(|| {
                merchants.push(tx.merchant.as_str());
                Vec::new()
            })
            .push(tx);
    }

    merchants
        .into_iter()
        .filter_map(|merchant| {
            let txs = by_merchant.get(merchant)?;
            detect_subscription_pattern(merchant, txs, as_of)
        })
        .collect()
}

/// Sum of inferred subscription amounts
pub fn total_subscription_cost(subscriptions: &[Subscription]) -> f64 {
    subscriptions.iter().map(|s| s.amount).sum()
}

/// Map an average gap between charges (in days) to a billing frequency
///
/// Gaps between 35 and 300 days have no better match and stay monthly.
pub fn classify_frequency(avg_gap_days: f64) -> Frequency {
    if avg_gap_days <= 7.0 {
        Frequency::Weekly
    } else if avg_gap_days <= 35.0 {
        Frequency::Monthly
    } else if avg_gap_days > 300.0 {
        Frequency::Yearly
    } else {
        Frequency::Monthly
    }
}

fn detect_subscription_pattern(
    merchant: &str,
    transactions: &[&Transaction],
    as_of: DateTime<Utc>,
) -> Option<Subscription> {
    if transactions.len() < MIN_OCCURRENCES {
        debug!(
            "Skipping {} - only {} recurring charge(s)",
            merchant,
            transactions.len()
        );
        return None;
    }

    let amounts: Vec<f64> = transactions.iter().map(|t| t.amount).collect();
    let amount = mean(&amounts);

    let mut dates: Vec<NaiveDate> = transactions.iter().map(|t| t.date).collect();
    dates.sort();

    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|w| days_between(start_of_day(w[0]), start_of_day(w[1])) as f64)
        .collect();
    let frequency = classify_frequency(mean(&gaps));

    let last_charge = *dates.last()?;
    let charges = u32::try_from(transactions.len()).unwrap_or(u32::MAX);
    let detected_pattern = charges
        .saturating_mul(CONFIDENCE_PER_CHARGE)
        .min(MAX_CONFIDENCE);

    debug!(
        "Found subscription: {} @ {:.2}/{} ({} charges, last {})",
        merchant, amount, frequency, charges, last_charge
    );

    Some(Subscription {
        id: subscription_id(merchant),
        merchant: merchant.to_string(),
        amount,
        frequency,
        last_charge,
        detected_pattern,
        estimated_next_charge: estimate_next_charge(last_charge, frequency),
        days_since_last_use: days_between(start_of_day(last_charge), as_of),
    })
}

/// `sub-` plus the lowercased merchant with each whitespace character as `-`
fn subscription_id(merchant: &str) -> String {
    let slug: String = merchant
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("sub-{}", slug)
}

fn estimate_next_charge(last_charge: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => last_charge.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => last_charge.checked_add_signed(Duration::days(7)),
        Frequency::Monthly => last_charge.checked_add_months(Months::new(1)),
        Frequency::Yearly => last_charge.checked_add_months(Months::new(12)),
    }
}

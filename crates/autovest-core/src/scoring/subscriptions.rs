//! Subscription Health - leak detection per subscription
//!
//! Health = usage × 0.40 + cost burden × 0.35 + affordability × 0.25
//!
//! A subscription is flagged for cancellation when its health drops below 40
//! or when nothing was charged for more than 60 days. Either condition alone
//! is enough.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::ScoringConfig;
use crate::detect::detect_subscriptions;
use crate::error::Result;
use crate::models::{
    ScoringWarning, Subscription, SubscriptionAnalysis, SubscriptionHealthScore,
    UserFinancialProfile,
};
use crate::stats::{mean, normalize_score, round_score};

/// Days without a charge after which a subscription counts as unused
pub const STALE_AFTER_DAYS: i64 = 60;

/// Health below which cancellation is recommended
pub const CANCEL_BELOW_HEALTH: f64 = 40.0;

const USAGE_WEIGHT: f64 = 0.40;
const COST_WEIGHT: f64 = 0.35;
const AFFORDABILITY_WEIGHT: f64 = 0.25;

/// Score every detected subscription in the profile
pub fn calculate(
    profile: &UserFinancialProfile,
    as_of: DateTime<Utc>,
    config: &ScoringConfig,
) -> Result<SubscriptionHealthScore> {
    profile.validate()?;

    let mut warnings = Vec::new();
    if profile.transactions.is_empty() {
        warn!("Scoring subscriptions with no transactions; reporting full health");
        warnings.push(ScoringWarning::NoTransactions);
    }

    let subscriptions: Vec<SubscriptionAnalysis> =
        detect_subscriptions(&profile.transactions, as_of)
            .into_iter()
            .map(|sub| analyze_subscription(sub, profile.monthly_income))
            .collect();

    let total_score = if subscriptions.is_empty() {
        100
    } else {
        let scores: Vec<f64> = subscriptions
            .iter()
            .map(|s| f64::from(s.health_score))
            .collect();
        round_score(mean(&scores))
    };

    let total_monthly_waste: f64 = subscriptions
        .iter()
        .filter(|s| s.should_cancel)
        .map(|s| s.potential_savings)
        .sum();

    let mut recommendations = Vec::new();
    if total_monthly_waste > 0.0 {
        recommendations.push(format!(
            "Cancel unused subscriptions to save {}{:.2}/month",
            config.currency_symbol, total_monthly_waste
        ));
    }
    if subscriptions.iter().any(|s| s.cost_burden < 50) {
        recommendations.push("Consider cheaper alternatives for high-cost subscriptions".to_string());
    }
    if total_score < 60 {
        recommendations.push("Review all subscriptions for usage and value".to_string());
    }

    debug!(
        subscriptions = subscriptions.len(),
        flagged = subscriptions.iter().filter(|s| s.should_cancel).count(),
        total = total_score,
        "Subscription health scored"
    );

    Ok(SubscriptionHealthScore {
        total_score,
        subscriptions,
        total_monthly_waste,
        recommendations,
        warnings,
    })
}

/// Step function on the raw charge amount
fn affordability_factor(amount: f64) -> f64 {
    if amount < 20.0 {
        100.0
    } else if amount < 50.0 {
        70.0
    } else {
        50.0
    }
}

fn analyze_subscription(subscription: Subscription, monthly_income: f64) -> SubscriptionAnalysis {
    let days = subscription.days_since_last_use;
    let stale = days > STALE_AFTER_DAYS;

    let usage_confidence = if stale {
        0.0
    } else {
        normalize_score(100.0 - days as f64)
    };

    let cost_percentage = (subscription.amount / monthly_income) * 100.0;
    let cost_burden = normalize_score(100.0 - cost_percentage * 5.0);
    let affordability = affordability_factor(subscription.amount);

    let health = normalize_score(
        usage_confidence * USAGE_WEIGHT + cost_burden * COST_WEIGHT + affordability * AFFORDABILITY_WEIGHT,
    );

    // Decisions use the unrounded health
    let should_cancel = health < CANCEL_BELOW_HEALTH || stale;
    let cancel_confidence = if should_cancel {
        normalize_score(100.0 - health)
    } else {
        0.0
    };

    let reasoning = if stale {
        format!("No activity detected in {} days - likely unused", days)
    } else if cost_percentage > 5.0 {
        format!("High cost burden ({:.1}% of income)", cost_percentage)
    } else if health > 70.0 {
        "Actively used and affordable".to_string()
    } else {
        "Monitor usage patterns".to_string()
    };

    if should_cancel {
        debug!("Flagging {} for cancellation: {}", subscription.merchant, reasoning);
    }

    let potential_savings = if should_cancel { subscription.amount } else { 0.0 };

    SubscriptionAnalysis {
        subscription,
        health_score: round_score(health),
        usage_confidence: round_score(usage_confidence),
        cost_burden: round_score(cost_burden),
        should_cancel,
        cancel_confidence: round_score(cancel_confidence),
        reasoning,
        potential_savings,
    }
}

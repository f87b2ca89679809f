//! Investment Decision - adaptive auto-invest of spare change
//!
//! The health score maps linearly onto an aggression multiplier in
//! [0.3, 1.0]. Stable spending, a deep emergency fund and a light
//! subscription load each add a confidence boost on top, and the product is
//! capped at 1.0.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::detect::{detect_subscriptions, total_subscription_cost};
use crate::error::{Error, Result};
use crate::models::{InvestmentDecision, RiskProfile, UserFinancialProfile};
use crate::stats::{coefficient_of_variation, monthly_totals, round_to_cents};

/// Multiplier at a health score of 0
pub const MIN_AGGRESSION: f64 = 0.3;

/// Minimum health score before any spare change is invested
pub const INVEST_THRESHOLD: f64 = 35.0;

// Boosts are tracked in hundredths so thresholds compare exactly
const BASE_BOOST: u32 = 100;
const STABLE_SPENDING_BOOST: u32 = 10;
const EMERGENCY_FUND_BOOST: u32 = 15;
const LOW_SUBSCRIPTION_BOOST: u32 = 5;
const HIGH_DISCIPLINE_BOOST: u32 = 115;

/// Linear map from a 0-100 health score to a 0.3-1.0 multiplier
pub fn aggression_multiplier(health_score: f64) -> f64 {
    MIN_AGGRESSION + (health_score / 100.0) * (1.0 - MIN_AGGRESSION)
}

/// Decide whether and how much of `spare_change` to invest
pub fn decide(
    health_score: f64,
    spare_change: f64,
    profile: &UserFinancialProfile,
    as_of: DateTime<Utc>,
) -> Result<InvestmentDecision> {
    profile.validate()?;
    if !health_score.is_finite() || !(0.0..=100.0).contains(&health_score) {
        return Err(Error::InvalidData(format!(
            "health score must be between 0 and 100, got {}",
            health_score
        )));
    }
    if !spare_change.is_finite() || spare_change < 0.0 {
        return Err(Error::InvalidData(format!(
            "spare change must be a non-negative amount, got {}",
            spare_change
        )));
    }

    let base_multiplier = aggression_multiplier(health_score);

    let mut boost = BASE_BOOST;

    let monthly_spending = monthly_totals(&profile.transactions);
    if monthly_spending.len() >= 3 && coefficient_of_variation(&monthly_spending) < 0.2 {
        boost += STABLE_SPENDING_BOOST;
    }

    let months_of_expenses = profile.months_of_expenses();
    if months_of_expenses > 3.0 {
        boost += EMERGENCY_FUND_BOOST;
    }

    let subscriptions = detect_subscriptions(&profile.transactions, as_of);
    let subscription_ratio = total_subscription_cost(&subscriptions) / profile.monthly_income;
    if subscription_ratio < 0.10 {
        boost += LOW_SUBSCRIPTION_BOOST;
    }

    let confidence_boost = f64::from(boost) / 100.0;
    let final_multiplier = (base_multiplier * confidence_boost).min(1.0);
    let amount = round_to_cents(spare_change * final_multiplier);

    let risk_level = RiskProfile::from_score(health_score);
    let should_invest =
        health_score >= INVEST_THRESHOLD && profile.liquid_savings > profile.monthly_expenses;

    let aggression = health_score.round() as u8;
    let percentage = (final_multiplier * 100.0).round() as u32;

    let reasoning = if !should_invest {
        "Investment paused - build emergency fund first".to_string()
    } else {
        match risk_level {
            RiskProfile::Aggressive => format!(
                "Strong financial health ({}/100) - investing {}% of spare change",
                aggression, percentage
            ),
            RiskProfile::Moderate => format!(
                "Good financial position - balanced approach with {}% investment rate",
                percentage
            ),
            RiskProfile::Conservative | RiskProfile::Minimal => format!(
                "Conservative approach recommended - investing {}% until health improves",
                percentage
            ),
        }
    };

    let mut recommendations = Vec::new();
    if health_score < 60.0 {
        recommendations.push("Focus on improving financial health score for better returns".to_string());
    }
    if months_of_expenses < 3.0 {
        recommendations.push("Prioritize building 3-month emergency fund".to_string());
    }
    if boost > HIGH_DISCIPLINE_BOOST {
        recommendations
            .push("Excellent financial discipline - maximizing investment potential".to_string());
    }

    debug!(
        base = base_multiplier,
        boost = confidence_boost,
        multiplier = final_multiplier,
        "Aggression computed"
    );
    if should_invest {
        info!("Investing {:.2} of {:.2} spare change", amount, spare_change);
    } else {
        info!("Investment paused at health score {}", aggression);
    }

    Ok(InvestmentDecision {
        should_invest,
        amount,
        aggression,
        reasoning,
        spare_change,
        aggression_multiplier: final_multiplier,
        confidence_boost,
        risk_level,
        recommendations,
    })
}

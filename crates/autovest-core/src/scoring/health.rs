//! Financial Health Score
//!
//! FHS = SS × 0.30 + EB × 0.35 + SB × 0.20 + MR × 0.15
//!
//! - **SS** spending stability: 100 − CV×100 over monthly spending totals
//! - **EB** emergency buffer: months of expenses saved × 25 (4 months = 100)
//! - **SB** subscription burden: 100 − 2 × subscription cost as % of income
//! - **MR** market risk: 100 − volatility × 500
//!
//! Sub-scores are rounded before weighting. With fewer than two months of
//! spending the CV is 0 and stability reads as perfect; that collapse is kept
//! and surfaced as a `ScoringWarning::InsufficientHistory`.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::detect::{detect_subscriptions, total_subscription_cost};
use crate::error::Result;
use crate::models::{
    EmergencyBuffer, FinancialBehaviorScore, MarketRisk, RiskProfile, ScoreBreakdown,
    ScoringWarning, SpendingStability, SubscriptionBurden, UserFinancialProfile,
};
use crate::stats::{coefficient_of_variation, monthly_totals, normalize_score, round_score};

pub const SPENDING_STABILITY_WEIGHT: f64 = 0.30;
pub const EMERGENCY_BUFFER_WEIGHT: f64 = 0.35;
pub const SUBSCRIPTION_BURDEN_WEIGHT: f64 = 0.20;
pub const MARKET_RISK_WEIGHT: f64 = 0.15;

/// Compute the Financial Health Score for a profile
pub fn calculate(profile: &UserFinancialProfile, as_of: DateTime<Utc>) -> Result<FinancialBehaviorScore> {
    profile.validate()?;

    let mut warnings = Vec::new();

    // 1. Spending stability
    let monthly_spending = monthly_totals(&profile.transactions);
    if profile.transactions.is_empty() {
        warn!("Scoring profile with no transactions; stability and subscriptions are neutral");
        warnings.push(ScoringWarning::NoTransactions);
    } else if monthly_spending.len() < 2 {
        warn!(
            months = monthly_spending.len(),
            "Not enough spending history to measure stability"
        );
        warnings.push(ScoringWarning::InsufficientHistory {
            months: monthly_spending.len(),
        });
    }
    let cv = coefficient_of_variation(&monthly_spending);
    let stability = normalize_score(100.0 - cv * 100.0);

    // 2. Emergency buffer
    let months_of_expenses = profile.months_of_expenses();
    let buffer = normalize_score(months_of_expenses * 25.0);

    // 3. Subscription burden
    let subscriptions = detect_subscriptions(&profile.transactions, as_of);
    let total_subscription_cost = total_subscription_cost(&subscriptions);
    let percentage_of_income = (total_subscription_cost / profile.monthly_income) * 100.0;
    let burden = normalize_score(100.0 - percentage_of_income * 2.0);

    // 4. Market risk
    let volatility = profile.market_volatility();
    let market = normalize_score(100.0 - volatility * 500.0);

    let breakdown = ScoreBreakdown {
        spending_stability: SpendingStability {
            score: round_score(stability),
            weight: SPENDING_STABILITY_WEIGHT,
            coefficient_of_variation: cv,
            months_observed: monthly_spending.len(),
            interpretation: stability_interpretation(cv).to_string(),
        },
        emergency_buffer: EmergencyBuffer {
            score: round_score(buffer),
            weight: EMERGENCY_BUFFER_WEIGHT,
            months_of_expenses,
            liquid_savings: profile.liquid_savings,
            interpretation: buffer_interpretation(months_of_expenses).to_string(),
        },
        subscription_burden: SubscriptionBurden {
            score: round_score(burden),
            weight: SUBSCRIPTION_BURDEN_WEIGHT,
            percentage_of_income,
            total_subscription_cost,
            interpretation: burden_interpretation(percentage_of_income).to_string(),
        },
        market_risk: MarketRisk {
            score: round_score(market),
            weight: MARKET_RISK_WEIGHT,
            volatility_index: volatility,
            interpretation: market_interpretation(volatility).to_string(),
        },
    };

    let total_score = round_score(weighted_total(&breakdown));
    let risk_profile = RiskProfile::from_score(f64::from(total_score));

    debug!(
        stability = breakdown.spending_stability.score,
        buffer = breakdown.emergency_buffer.score,
        burden = breakdown.subscription_burden.score,
        market = breakdown.market_risk.score,
        total = total_score,
        "Financial health scored"
    );

    // Thresholds compare the unrounded sub-scores
    let mut recommendations = Vec::new();
    if stability < 60.0 {
        recommendations
            .push("Consider creating a monthly budget to stabilize spending patterns".to_string());
    }
    if buffer < 50.0 {
        recommendations.push("Build emergency fund to at least 2 months of expenses".to_string());
    }
    if burden < 70.0 {
        recommendations
            .push("Review and cancel unused subscriptions to reduce financial burden".to_string());
    }
    if market < 60.0 {
        recommendations
            .push("Consider more conservative investments during high volatility".to_string());
    }

    Ok(FinancialBehaviorScore {
        total_score,
        breakdown,
        risk_profile,
        recommendations,
        warnings,
    })
}

/// Weighted sum of the rounded sub-scores, clamped to 0-100
fn weighted_total(breakdown: &ScoreBreakdown) -> f64 {
    normalize_score(
        f64::from(breakdown.spending_stability.score) * SPENDING_STABILITY_WEIGHT
            + f64::from(breakdown.emergency_buffer.score) * EMERGENCY_BUFFER_WEIGHT
            + f64::from(breakdown.subscription_burden.score) * SUBSCRIPTION_BURDEN_WEIGHT
            + f64::from(breakdown.market_risk.score) * MARKET_RISK_WEIGHT,
    )
}

fn stability_interpretation(cv: f64) -> &'static str {
    if cv < 0.2 {
        "Very stable"
    } else if cv < 0.4 {
        "Moderately stable"
    } else {
        "Unstable"
    }
}

fn buffer_interpretation(months_of_expenses: f64) -> &'static str {
    if months_of_expenses >= 3.0 {
        "Excellent"
    } else if months_of_expenses >= 2.0 {
        "Good"
    } else {
        "Needs improvement"
    }
}

fn burden_interpretation(percentage_of_income: f64) -> &'static str {
    if percentage_of_income < 10.0 {
        "Healthy"
    } else if percentage_of_income < 20.0 {
        "Moderate"
    } else {
        "High burden"
    }
}

fn market_interpretation(volatility: f64) -> &'static str {
    if volatility < 0.15 {
        "Low risk"
    } else if volatility < 0.25 {
        "Moderate risk"
    } else {
        "High risk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Transaction;
    use crate::stats::start_of_day;
    use chrono::NaiveDate;

    fn as_of() -> DateTime<Utc> {
        start_of_day(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap())
    }

    fn spend(id: &str, date: &str, amount: f64, merchant: &str, recurring: bool) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount,
            merchant: merchant.to_string(),
            category: if recurring { "Entertainment" } else { "Groceries" }.to_string(),
            description: String::new(),
            is_recurring: recurring,
        }
    }

    fn flat_profile(liquid_savings: f64) -> UserFinancialProfile {
        UserFinancialProfile {
            monthly_income: 5000.0,
            liquid_savings,
            monthly_expenses: 3200.0,
            transactions: vec![
                spend("1", "2024-01-10", 1000.0, "Whole Foods", false),
                spend("2", "2024-02-10", 1000.0, "Whole Foods", false),
                spend("3", "2024-03-10", 1000.0, "Whole Foods", false),
            ],
            market_volatility: Some(0.15),
        }
    }

    #[test]
    fn test_flat_spending_scenario() {
        let score = calculate(&flat_profile(8000.0), as_of()).unwrap();
        let b = &score.breakdown;

        assert_eq!(b.spending_stability.score, 100);
        assert_eq!(b.spending_stability.coefficient_of_variation, 0.0);
        assert_eq!(b.spending_stability.months_observed, 3);
        assert_eq!(b.spending_stability.interpretation, "Very stable");

        assert_eq!(b.emergency_buffer.months_of_expenses, 2.5);
        assert_eq!(b.emergency_buffer.score, 63);
        assert_eq!(b.emergency_buffer.interpretation, "Good");

        assert_eq!(b.subscription_burden.score, 100);
        assert_eq!(b.subscription_burden.total_subscription_cost, 0.0);
        assert_eq!(b.subscription_burden.interpretation, "Healthy");

        assert_eq!(b.market_risk.score, 25);
        assert_eq!(b.market_risk.interpretation, "Moderate risk");

        // 100×0.30 + 63×0.35 + 100×0.20 + 25×0.15 = 75.8
        assert_eq!(score.total_score, 76);
        assert_eq!(score.risk_profile, RiskProfile::Moderate);
        assert_eq!(
            score.recommendations,
            vec!["Consider more conservative investments during high volatility"]
        );
        assert!(score.warnings.is_empty());
    }

    #[test]
    fn test_total_uses_rounded_sub_scores() {
        let score = calculate(&flat_profile(8000.0), as_of()).unwrap();
        let expected = (f64::from(score.breakdown.spending_stability.score) * 0.30
            + f64::from(score.breakdown.emergency_buffer.score) * 0.35
            + f64::from(score.breakdown.subscription_burden.score) * 0.20
            + f64::from(score.breakdown.market_risk.score) * 0.15)
            .round() as u8;
        assert_eq!(score.total_score, expected);
    }

    #[test]
    fn test_buffer_saturates_at_four_months() {
        let score = calculate(&flat_profile(3200.0 * 4.0), as_of()).unwrap();
        assert_eq!(score.breakdown.emergency_buffer.score, 100);
        assert_eq!(score.breakdown.emergency_buffer.interpretation, "Excellent");

        let score = calculate(&flat_profile(3200.0 * 10.0), as_of()).unwrap();
        assert_eq!(score.breakdown.emergency_buffer.score, 100);
    }

    #[test]
    fn test_buffer_is_monotonic_in_savings() {
        let mut previous = 0;
        for savings in (0..=20_000).step_by(500) {
            let score = calculate(&flat_profile(f64::from(savings)), as_of()).unwrap();
            assert!(score.breakdown.emergency_buffer.score >= previous);
            previous = score.breakdown.emergency_buffer.score;
        }
    }

    #[test]
    fn test_negative_savings_clamp_to_zero() {
        let score = calculate(&flat_profile(-500.0), as_of()).unwrap();
        assert_eq!(score.breakdown.emergency_buffer.score, 0);
        assert!(score
            .recommendations
            .contains(&"Build emergency fund to at least 2 months of expenses".to_string()));
    }

    #[test]
    fn test_unstable_spending() {
        let mut profile = flat_profile(8000.0);
        profile.transactions = vec![
            spend("1", "2024-01-10", 200.0, "Target", false),
            spend("2", "2024-02-10", 1800.0, "Target", false),
            spend("3", "2024-03-10", 1000.0, "Target", false),
        ];

        let score = calculate(&profile, as_of()).unwrap();
        let stability = &score.breakdown.spending_stability;
        assert!(stability.coefficient_of_variation > 0.4);
        assert_eq!(stability.interpretation, "Unstable");
        assert!(stability.score < 60);
        assert_eq!(
            score.recommendations[0],
            "Consider creating a monthly budget to stabilize spending patterns"
        );
    }

    #[test]
    fn test_subscription_burden() {
        let mut profile = flat_profile(8000.0);
        profile.monthly_income = 1000.0;
        profile.transactions = vec![
            spend("1", "2024-02-01", 100.0, "Gym", true),
            spend("2", "2024-03-01", 100.0, "Gym", true),
            spend("3", "2024-02-05", 50.0, "Music", true),
            spend("4", "2024-03-05", 50.0, "Music", true),
        ];

        let score = calculate(&profile, as_of()).unwrap();
        let burden = &score.breakdown.subscription_burden;
        assert_eq!(burden.total_subscription_cost, 150.0);
        assert_eq!(burden.percentage_of_income, 15.0);
        assert_eq!(burden.score, 70);
        assert_eq!(burden.interpretation, "Moderate");
    }

    #[test]
    fn test_recommendation_order() {
        let profile = UserFinancialProfile {
            monthly_income: 500.0,
            liquid_savings: 100.0,
            monthly_expenses: 3000.0,
            transactions: vec![
                spend("1", "2024-01-03", 100.0, "Stream", true),
                spend("2", "2024-02-03", 300.0, "Stream", true),
                spend("3", "2024-03-03", 20.0, "Stream", true),
            ],
            market_volatility: Some(0.4),
        };

        let score = calculate(&profile, as_of()).unwrap();
        assert_eq!(
            score.recommendations,
            vec![
                "Consider creating a monthly budget to stabilize spending patterns",
                "Build emergency fund to at least 2 months of expenses",
                "Review and cancel unused subscriptions to reduce financial burden",
                "Consider more conservative investments during high volatility",
            ]
        );
        assert_eq!(score.risk_profile, RiskProfile::Minimal);
        assert_eq!(score.breakdown.market_risk.interpretation, "High risk");
    }

    #[test]
    fn test_empty_transactions_are_neutral() {
        let mut profile = flat_profile(8000.0);
        profile.transactions.clear();

        let score = calculate(&profile, as_of()).unwrap();
        assert_eq!(score.warnings, vec![ScoringWarning::NoTransactions]);
        assert_eq!(score.breakdown.spending_stability.score, 100);
        assert_eq!(score.breakdown.subscription_burden.score, 100);
        assert_eq!(score.breakdown.spending_stability.months_observed, 0);
        assert_eq!(score.total_score, 76);
    }

    #[test]
    fn test_single_month_collapses_to_perfect_stability() {
        let mut profile = flat_profile(8000.0);
        profile.transactions = vec![
            spend("1", "2024-03-01", 50.0, "Target", false),
            spend("2", "2024-03-20", 2950.0, "Target", false),
        ];

        let score = calculate(&profile, as_of()).unwrap();
        assert_eq!(score.breakdown.spending_stability.score, 100);
        assert_eq!(
            score.warnings,
            vec![ScoringWarning::InsufficientHistory { months: 1 }]
        );
    }

    #[test]
    fn test_default_market_volatility() {
        let mut profile = flat_profile(8000.0);
        profile.market_volatility = None;

        let score = calculate(&profile, as_of()).unwrap();
        assert_eq!(score.breakdown.market_risk.volatility_index, 0.15);
        assert_eq!(score.breakdown.market_risk.score, 25);

        profile.market_volatility = Some(0.05);
        let score = calculate(&profile, as_of()).unwrap();
        assert_eq!(score.breakdown.market_risk.score, 75);
        assert_eq!(score.breakdown.market_risk.interpretation, "Low risk");
    }

    #[test]
    fn test_scores_stay_in_range() {
        for volatility in [0.0, 0.1, 0.5, 1.0] {
            for savings in [-10_000.0, 0.0, 5_000.0, 1_000_000.0] {
                let mut profile = flat_profile(savings);
                profile.market_volatility = Some(volatility);
                let score = calculate(&profile, as_of()).unwrap();
                assert!(score.total_score <= 100);
                for (_, s) in score.breakdown.named_scores() {
                    assert!(s <= 100);
                }
            }
        }
    }

    #[test]
    fn test_invalid_profile() {
        let mut profile = flat_profile(8000.0);
        profile.monthly_expenses = 0.0;
        assert!(matches!(
            calculate(&profile, as_of()),
            Err(Error::InvalidProfile(_))
        ));
    }
}

//! Full analysis: every score, the spare-change pool and the decision on it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::explain::ExplanationGenerator;
use crate::models::{
    FinancialBehaviorScore, InvestmentDecision, RoundUpCap, SubscriptionHealthScore,
    UserFinancialProfile,
};
use crate::scoring::ScoringEngine;
use crate::settings::InsightLevel;
use crate::stats::total_spare_change;

/// Everything the dashboard shows for one profile at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub financial_behavior_score: FinancialBehaviorScore,
    pub subscription_health_score: SubscriptionHealthScore,
    pub investment_decision: InvestmentDecision,
    /// Spare change pooled over the profile's transactions
    pub spare_change: f64,
    pub round_up_cap: RoundUpCap,
    pub timestamp: DateTime<Utc>,
}

impl FinancialAnalysis {
    pub fn health_score(&self) -> u8 {
        self.financial_behavior_score.total_score
    }

    /// "Aggressive", "Balanced", "Conservative" or "Minimal"
    pub fn investment_mode(&self) -> &'static str {
        self.investment_decision.risk_level.investment_mode()
    }

    pub fn leak_risk(&self) -> u8 {
        self.subscription_health_score.leak_risk()
    }

    pub fn potential_monthly_savings(&self) -> f64 {
        self.subscription_health_score.total_monthly_waste
    }

    /// Explanation text, as much as `level` asks for
    pub fn explanations(&self, generator: &ExplanationGenerator, level: InsightLevel) -> Explanations {
        let summary = generator.dashboard_summary(
            &self.financial_behavior_score,
            &self.subscription_health_score,
            &self.investment_decision,
        );

        let detailed = matches!(level, InsightLevel::Advanced | InsightLevel::Full);
        let health = detailed.then(|| generator.health_score(&self.financial_behavior_score));
        let subscriptions =
            detailed.then(|| generator.subscription_health(&self.subscription_health_score));
        let investment = (level == InsightLevel::Full)
            .then(|| generator.investment(&self.investment_decision, self.health_score()));

        Explanations {
            summary,
            health,
            subscriptions,
            investment,
        }
    }
}

/// Explanation text for an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanations {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment: Option<String>,
}

impl ScoringEngine {
    /// Score a profile and decide how much of its pooled spare change to invest
    ///
    /// The decision runs on the rounded Financial Health Score.
    pub fn analyze(&self, profile: &UserFinancialProfile, cap: RoundUpCap) -> Result<FinancialAnalysis> {
        let financial_behavior_score = self.financial_health(profile)?;
        let subscription_health_score = self.subscription_health(profile)?;

        let spare_change = total_spare_change(&profile.transactions, cap);
        let investment_decision = self.investment_decision(
            f64::from(financial_behavior_score.total_score),
            spare_change,
            profile,
        )?;

        info!(
            health = financial_behavior_score.total_score,
            subscriptions = subscription_health_score.total_score,
            spare_change,
            invest = investment_decision.should_invest,
            "Analysis complete"
        );

        Ok(FinancialAnalysis {
            financial_behavior_score,
            subscription_health_score,
            investment_decision,
            spare_change,
            round_up_cap: cap,
            timestamp: self.as_of(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;
    use crate::sample;
    use crate::stats::start_of_day;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
    }

    fn tx(id: &str, day: u32, amount: f64, merchant: &str, category: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            amount,
            merchant: merchant.to_string(),
            category: category.to_string(),
            description: String::new(),
            is_recurring: matches!(category, "Entertainment" | "Utilities"),
        }
    }

    /// The five purchases of the starter dashboard
    fn starter_profile() -> UserFinancialProfile {
        UserFinancialProfile {
            monthly_income: 5000.0,
            liquid_savings: 8000.0,
            monthly_expenses: 3200.0,
            transactions: vec![
                tx("1", 15, 143.0, "Coffee Shop", "Food"),
                tx("2", 15, 287.0, "Uber Ride", "Transport"),
                tx("3", 14, 1234.0, "Grocery Store", "Groceries"),
                tx("4", 14, 649.0, "Netflix", "Entertainment"),
                tx("5", 13, 1876.0, "Electricity Bill", "Utilities"),
            ],
            market_volatility: Some(0.15),
        }
    }

    #[test]
    fn test_analyze_starter_profile() {
        let engine = ScoringEngine::at(start_of_day(today()));
        let analysis = engine.analyze(&starter_profile(), RoundUpCap::Ten).unwrap();

        // 7 + 3 + 6 + 1 + 4
        assert_eq!(analysis.spare_change, 21.0);
        assert_eq!(analysis.round_up_cap, RoundUpCap::Ten);
        assert_eq!(analysis.timestamp, engine.as_of());

        // One month of history and no repeated merchants
        assert_eq!(analysis.subscription_health_score.total_score, 100);
        assert_eq!(analysis.health_score(), 76);
        assert_eq!(analysis.investment_mode(), "Balanced");
        assert_eq!(analysis.leak_risk(), 0);
        assert_eq!(analysis.potential_monthly_savings(), 0.0);

        let decision = &analysis.investment_decision;
        assert_eq!(decision.spare_change, 21.0);
        assert!(decision.should_invest);
        // (0.3 + 0.76×0.7) × 1.05
        assert_eq!(decision.investment_percentage(), 87);
        assert_eq!(decision.amount, 18.35);
    }

    #[test]
    fn test_analysis_feeds_rounded_health_into_decision() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        let engine = ScoringEngine::at(start_of_day(today));
        let profile = sample::struggling_profile(today);

        let analysis = engine.analyze(&profile, RoundUpCap::Fifty).unwrap();
        let direct = engine
            .investment_decision(
                f64::from(analysis.health_score()),
                analysis.spare_change,
                &profile,
            )
            .unwrap();
        assert_eq!(analysis.investment_decision, direct);
        assert_eq!(analysis.financial_behavior_score, engine.financial_health(&profile).unwrap());
        // Savings below one month of expenses
        assert!(!analysis.investment_decision.should_invest);
    }

    #[test]
    fn test_explanations_follow_insight_level() {
        let engine = ScoringEngine::at(start_of_day(today()));
        let analysis = engine.analyze(&starter_profile(), RoundUpCap::Ten).unwrap();
        let generator = ExplanationGenerator::default();

        let basic = analysis.explanations(&generator, InsightLevel::Basic);
        assert!(basic.summary.contains("Health score: 76/100 (moderate)"));
        assert!(basic.health.is_none());
        assert!(basic.subscriptions.is_none());
        assert!(basic.investment.is_none());

        let advanced = analysis.explanations(&generator, InsightLevel::Advanced);
        assert!(advanced.health.is_some());
        assert!(advanced.subscriptions.is_some());
        assert!(advanced.investment.is_none());

        let full = analysis.explanations(&generator, InsightLevel::Full);
        let investment = full.investment.unwrap();
        assert!(investment.contains("Investing ₹18.35 (87% of ₹21.00 spare change)"));
    }

    #[test]
    fn test_analysis_serializes() {
        let engine = ScoringEngine::at(start_of_day(today()));
        let analysis = engine.analyze(&starter_profile(), RoundUpCap::Ten).unwrap();

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["round_up_cap"], 10);
        assert_eq!(json["financial_behavior_score"]["risk_profile"], "moderate");
        assert!(json["financial_behavior_score"].get("warnings").is_some());

        let back: FinancialAnalysis = serde_json::from_value(json).unwrap();
        assert_eq!(back.health_score(), 76);
        assert_eq!(back.spare_change, 21.0);
        assert_eq!(back.timestamp, analysis.timestamp);
    }
}

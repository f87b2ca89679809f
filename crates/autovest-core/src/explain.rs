//! Plain-language explanations for scores and decisions
//!
//! Template-driven text for the dashboard and CLI. Nothing here feeds back
//! into scoring.

use crate::models::{
    FinancialBehaviorScore, InvestmentDecision, RiskProfile, SubscriptionHealthScore,
};
use crate::scoring::ScoringConfig;

/// Maximum flagged subscriptions listed in one explanation
const MAX_LISTED_SUBSCRIPTIONS: usize = 3;

/// Trend changes within this many points read as stable
const TREND_THRESHOLD: f64 = 5.0;

/// Badge label for a 0-100 score
pub fn health_score_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent"
    } else if score >= 60.0 {
        "Good"
    } else if score >= 40.0 {
        "Fair"
    } else {
        "Poor"
    }
}

#[derive(Debug, Clone)]
pub struct ExplanationGenerator {
    currency_symbol: String,
}

impl Default for ExplanationGenerator {
    fn default() -> Self {
        Self::new(&ScoringConfig::default().currency_symbol)
    }
}

impl From<&ScoringConfig> for ExplanationGenerator {
    fn from(config: &ScoringConfig) -> Self {
        Self::new(&config.currency_symbol)
    }
}

impl ExplanationGenerator {
    pub fn new(currency_symbol: &str) -> Self {
        Self {
            currency_symbol: currency_symbol.to_string(),
        }
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }

    /// Explain a Financial Health Score
    pub fn health_score(&self, score: &FinancialBehaviorScore) -> String {
        let total = score.total_score;
        let breakdown = &score.breakdown;

        let mut explanation = if total >= 80 {
            format!("🎯 Excellent financial health! Your score of {}/100 indicates strong financial discipline and stability. ", total)
        } else if total >= 60 {
            format!("✅ Good financial position. Your score of {}/100 shows solid fundamentals with room for optimization. ", total)
        } else if total >= 40 {
            format!("⚠️ Fair financial health. Your score of {}/100 suggests some areas need attention. ", total)
        } else {
            format!("🚨 Financial health needs improvement. Your score of {}/100 indicates significant risk factors. ", total)
        };

        // Ties resolve to the earliest area
        let areas = breakdown.named_scores();
        let mut strongest = areas[0];
        let mut weakest = areas[0];
        for area in &areas[1..] {
            if area.1 > strongest.1 {
                strongest = *area;
            }
            if area.1 < weakest.1 {
                weakest = *area;
            }
        }

        explanation.push_str(&format!(
            "Your strongest area is {} ({}/100). ",
            strongest.0, strongest.1
        ));
        if weakest.1 < 60 {
            explanation.push_str(&format!(
                "Consider improving your {} ({}/100) for better overall health. ",
                weakest.0, weakest.1
            ));
        }

        if breakdown.emergency_buffer.months_of_expenses < 2.0 {
            explanation.push_str(&format!(
                "\n\n💡 Priority: Build your emergency fund to at least 2 months of expenses (currently {:.1} months).",
                breakdown.emergency_buffer.months_of_expenses
            ));
        }
        if breakdown.spending_stability.coefficient_of_variation > 0.4 {
            explanation.push_str("\n\n📊 Insight: Your spending varies significantly month-to-month. Creating a budget could improve stability.");
        }
        if breakdown.subscription_burden.percentage_of_income > 15.0 {
            explanation.push_str(&format!(
                "\n\n💳 Alert: Subscriptions consume {:.1}% of your income. Review for unused services.",
                breakdown.subscription_burden.percentage_of_income
            ));
        }

        explanation.push_str(&format!(
            "\n\nInvestment Profile: {}",
            score.risk_profile.label()
        ));
        explanation
    }

    /// Explain subscription health and list what to cancel
    pub fn subscription_health(&self, health: &SubscriptionHealthScore) -> String {
        let total = health.total_score;

        let mut explanation = if total >= 80 {
            "✨ Healthy subscription portfolio! All your subscriptions appear to be actively used and well-managed. "
        } else if total >= 60 {
            "👍 Decent subscription health. Most subscriptions are justified, but some optimization possible. "
        } else if total >= 40 {
            "⚠️ Subscription leakage detected. Several subscriptions may not be providing value. "
        } else {
            "🚨 High subscription waste! Multiple unused subscriptions are draining your finances. "
        }
        .to_string();

        let flagged: Vec<_> = health.flagged().collect();
        if flagged.is_empty() {
            explanation.push_str(&format!(
                "All {} subscriptions are actively used and affordable.",
                health.subscriptions.len()
            ));
            return explanation;
        }

        explanation.push_str(&format!(
            "\n\n{} subscription{} flagged for review:\n",
            flagged.len(),
            if flagged.len() > 1 { "s" } else { "" }
        ));
        for analysis in flagged.iter().take(MAX_LISTED_SUBSCRIPTIONS) {
            explanation.push_str(&format!(
                "\n• {} ({}/month) - {}",
                analysis.subscription.merchant,
                self.money(analysis.subscription.amount),
                analysis.reasoning
            ));
        }

        if health.total_monthly_waste > 0.0 {
            explanation.push_str(&format!(
                "\n\n💰 Potential savings: {}/month ({}/year)",
                self.money(health.total_monthly_waste),
                self.money(health.total_monthly_waste * 12.0)
            ));
        }
        explanation
    }

    /// Explain an investment decision made at `health_score`
    pub fn investment(&self, decision: &InvestmentDecision, health_score: u8) -> String {
        if !decision.should_invest {
            return format!(
                "🛡️ Investment paused for safety. Your current financial health ({}/100) suggests focusing on building emergency reserves before investing. \n\nOnce your emergency fund reaches 2+ months of expenses, we'll automatically resume investments.",
                health_score
            );
        }

        let mut explanation = match decision.risk_level {
            RiskProfile::Aggressive => format!("🚀 Aggressive investment mode active! Your strong financial health ({}/100) allows for maximum investment potential. ", health_score),
            RiskProfile::Moderate => format!("⚖️ Balanced investment approach. Your good financial position ({}/100) supports moderate investment activity. ", health_score),
            RiskProfile::Conservative => format!("🛡️ Conservative investment mode. Given your current health score ({}/100), we're taking a cautious approach. ", health_score),
            RiskProfile::Minimal => format!("🐌 Minimal investment mode. Your financial health ({}/100) requires careful, limited investing. ", health_score),
        };

        explanation.push_str(&format!(
            "\n\nCurrent transaction: Investing {} ({}% of {} spare change)",
            self.money(decision.amount),
            decision.investment_percentage(),
            self.money(decision.spare_change)
        ));

        if decision.aggression_multiplier > 0.8 {
            explanation.push_str("\n\n✨ Confidence boost applied! Your excellent financial discipline earned bonus investment allocation.");
        } else if decision.aggression_multiplier < 0.5 {
            explanation.push_str("\n\n⚠️ Reduced allocation to protect your financial stability. Focus on improving health score for better returns.");
        }

        if health_score < 70 {
            explanation.push_str("\n\n📈 Growth potential: Improve your health score to unlock higher investment rates and better returns.");
        }
        explanation
    }

    /// One-paragraph status for the dashboard
    pub fn dashboard_summary(
        &self,
        health: &FinancialBehaviorScore,
        subscriptions: &SubscriptionHealthScore,
        investment: &InvestmentDecision,
    ) -> String {
        let mut summary = if health.total_score >= 70 && subscriptions.total_score >= 70 {
            "🌟 Strong financial position! Your disciplined approach is paying off. "
        } else if health.total_score >= 50 {
            "📊 Steady progress. You're on the right track with room for optimization. "
        } else {
            "🎯 Focus mode activated. Let's work on strengthening your financial foundation. "
        }
        .to_string();

        summary.push_str(&format!(
            "Health score: {}/100 ({})",
            health.total_score, health.risk_profile
        ));

        let buffer = &health.breakdown.emergency_buffer;
        if buffer.score < 50 {
            summary.push_str(&format!(
                "\n\nTop Priority: Build emergency fund to {} months of expenses.",
                (buffer.months_of_expenses + 1.0).ceil() as i64
            ));
        } else if subscriptions.total_monthly_waste > 50.0 {
            summary.push_str(&format!(
                "\n\nQuick Win: Cancel unused subscriptions to save {}{:.0}/month.",
                self.currency_symbol, subscriptions.total_monthly_waste
            ));
        } else if investment.should_invest && investment.aggression_multiplier < 0.6 {
            summary.push_str("\n\nOpportunity: Improve stability to unlock higher investment rates.");
        }
        summary
    }

    /// Change indicator between two readings of the same score
    pub fn trend(&self, current: f64, previous: Option<f64>) -> String {
        let Some(previous) = previous else {
            return "New metric".to_string();
        };

        let diff = current - previous;
        if diff > TREND_THRESHOLD {
            format!("↑ Up {:.0} points", diff)
        } else if diff < -TREND_THRESHOLD {
            format!("↓ Down {:.0} points", diff.abs())
        } else {
            "→ Stable".to_string()
        }
    }

    pub fn confidence(&self, confidence: f64) -> &'static str {
        if confidence >= 90.0 {
            "Very high confidence - strong data pattern"
        } else if confidence >= 70.0 {
            "High confidence - reliable prediction"
        } else if confidence >= 50.0 {
            "Moderate confidence - monitor closely"
        } else {
            "Low confidence - needs more data"
        }
    }
}

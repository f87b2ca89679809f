//! Scoring Engine - health scores and investment decisions
//!
//! Turns a `UserFinancialProfile` into three derived results:
//!
//! - **Financial Health Score** - weighted stability, buffer, subscription and
//!   market-risk sub-scores
//! - **Subscription Health** - per-subscription leak analysis and monthly waste
//! - **Investment Decision** - how much spare change to auto-invest
//!
//! Every entry point is a pure function of its inputs plus the engine's
//! evaluation time, so results are reproducible with `ScoringEngine::at`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use autovest_core::scoring::ScoringEngine;
//!
//! let engine = ScoringEngine::new();
//! let health = engine.financial_health(&profile)?;
//! let decision = engine.investment_decision(health.total_score.into(), 16.0, &profile)?;
//! ```

pub mod health;
pub mod investment;
pub mod subscriptions;

use chrono::{DateTime, Utc};

use crate::detect;
use crate::error::Result;
use crate::models::{
    FinancialBehaviorScore, InvestmentDecision, Subscription, SubscriptionHealthScore, Transaction,
    UserFinancialProfile,
};

pub use health::{
    EMERGENCY_BUFFER_WEIGHT, MARKET_RISK_WEIGHT, SPENDING_STABILITY_WEIGHT,
    SUBSCRIPTION_BURDEN_WEIGHT,
};
pub use investment::aggression_multiplier;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Prefix for amounts in generated recommendation text
    pub currency_symbol: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Stateless scorer bound to an evaluation time
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    as_of: DateTime<Utc>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    /// Engine evaluated at the current wall-clock time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Engine evaluated at a fixed time
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self {
            config: ScoringConfig::default(),
            as_of,
        }
    }

    pub fn with_config(config: ScoringConfig, as_of: DateTime<Utc>) -> Self {
        Self { config, as_of }
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Detect subscriptions among recurring-flagged transactions
    pub fn detect_subscriptions(&self, transactions: &[Transaction]) -> Vec<Subscription> {
        detect::detect_subscriptions(transactions, self.as_of)
    }

    /// Compute the 0-100 Financial Health Score
    pub fn financial_health(&self, profile: &UserFinancialProfile) -> Result<FinancialBehaviorScore> {
        health::calculate(profile, self.as_of)
    }

    /// Score every detected subscription and estimate monthly waste
    pub fn subscription_health(
        &self,
        profile: &UserFinancialProfile,
    ) -> Result<SubscriptionHealthScore> {
        subscriptions::calculate(profile, self.as_of, &self.config)
    }

    /// Decide whether and how much of `spare_change` to invest
    pub fn investment_decision(
        &self,
        health_score: f64,
        spare_change: f64,
        profile: &UserFinancialProfile,
    ) -> Result<InvestmentDecision> {
        investment::decide(health_score, spare_change, profile, self.as_of)
    }
}

/// Financial Health Score evaluated now
pub fn calculate_financial_health_score(
    profile: &UserFinancialProfile,
) -> Result<FinancialBehaviorScore> {
    ScoringEngine::new().financial_health(profile)
}

/// Subscription Health evaluated now
pub fn calculate_subscription_health_score(
    profile: &UserFinancialProfile,
) -> Result<SubscriptionHealthScore> {
    ScoringEngine::new().subscription_health(profile)
}

/// Investment decision evaluated now
pub fn determine_investment_mode(
    health_score: f64,
    spare_change: f64,
    profile: &UserFinancialProfile,
) -> Result<InvestmentDecision> {
    ScoringEngine::new().investment_decision(health_score, spare_change, profile)
}

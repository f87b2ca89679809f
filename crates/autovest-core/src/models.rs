//! Domain models for AutoVest
//!
//! Inputs (`Transaction`, `UserFinancialProfile`) are supplied whole by the
//! caller and never mutated. Outputs are value objects built fresh on every
//! scoring call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Market volatility assumed when a profile does not carry one
pub const DEFAULT_MARKET_VOLATILITY: f64 = 0.15;

/// A spending transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    /// Positive currency units
    pub amount: f64,
    pub merchant: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Caller-assigned recurring flag (e.g. by category)
    #[serde(default)]
    pub is_recurring: bool,
}

/// Subscription billing frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subscription inferred from recurring transactions
///
/// Derived per scoring call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub merchant: String,
    /// Average charge amount
    pub amount: f64,
    pub frequency: Frequency,
    pub last_charge: NaiveDate,
    /// Heuristic detection confidence (0-100), saturating with charge count
    pub detected_pattern: u32,
    pub estimated_next_charge: Option<NaiveDate>,
    pub days_since_last_use: i64,
}

/// Everything the engine needs to know about a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFinancialProfile {
    pub monthly_income: f64,
    pub liquid_savings: f64,
    pub monthly_expenses: f64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// 0-1; `DEFAULT_MARKET_VOLATILITY` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_volatility: Option<f64>,
}

impl UserFinancialProfile {
    /// Market volatility with the default applied
    pub fn market_volatility(&self) -> f64 {
        self.market_volatility.unwrap_or(DEFAULT_MARKET_VOLATILITY)
    }

    /// Liquid savings expressed in months of expenses
    ///
    /// Only meaningful on a validated profile.
    pub fn months_of_expenses(&self) -> f64 {
        self.liquid_savings / self.monthly_expenses
    }

    /// Reject profiles that would make any score divide by zero or go non-finite
    pub fn validate(&self) -> Result<()> {
        if !self.monthly_income.is_finite() || self.monthly_income <= 0.0 {
            return Err(Error::InvalidProfile(format!(
                "monthly_income must be greater than zero (got {})",
                self.monthly_income
            )));
        }
        if !self.monthly_expenses.is_finite() || self.monthly_expenses <= 0.0 {
            return Err(Error::InvalidProfile(format!(
                "monthly_expenses must be greater than zero (got {})",
                self.monthly_expenses
            )));
        }
        if !self.liquid_savings.is_finite() {
            return Err(Error::InvalidProfile(format!(
                "liquid_savings must be a finite number (got {})",
                self.liquid_savings
            )));
        }
        if let Some(volatility) = self.market_volatility {
            if !(0.0..=1.0).contains(&volatility) {
                return Err(Error::InvalidProfile(format!(
                    "market_volatility must be within 0-1 (got {})",
                    volatility
                )));
            }
        }
        if let Some(tx) = self.transactions.iter().find(|tx| !tx.amount.is_finite()) {
            return Err(Error::InvalidProfile(format!(
                "transaction {} has a non-finite amount",
                tx.id
            )));
        }
        Ok(())
    }
}

/// Shared 4-band classification of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Aggressive,
    Moderate,
    Conservative,
    Minimal,
}

impl RiskProfile {
    /// Bands are inclusive on their lower bound: 80, 60, 40
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Aggressive
        } else if score >= 60.0 {
            Self::Moderate
        } else if score >= 40.0 {
            Self::Conservative
        } else {
            Self::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Moderate => "moderate",
            Self::Conservative => "conservative",
            Self::Minimal => "minimal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive",
            Self::Moderate => "Moderate",
            Self::Conservative => "Conservative",
            Self::Minimal => "Minimal",
        }
    }

    /// Name of the investment mode shown to users ("moderate" reads as "Balanced")
    pub fn investment_mode(&self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive",
            Self::Moderate => "Balanced",
            Self::Conservative => "Conservative",
            Self::Minimal => "Minimal",
        }
    }
}

impl std::str::FromStr for RiskProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggressive" => Ok(Self::Aggressive),
            "moderate" | "balanced" => Ok(Self::Moderate),
            "conservative" => Ok(Self::Conservative),
            "minimal" => Ok(Self::Minimal),
            _ => Err(format!("Unknown risk profile: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round-up granularity for spare change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RoundUpCap {
    #[default]
    Ten,
    Fifty,
    Hundred,
}

impl RoundUpCap {
    pub fn value(&self) -> f64 {
        f64::from(u32::from(*self))
    }

    pub fn all() -> &'static [RoundUpCap] {
        &[Self::Ten, Self::Fifty, Self::Hundred]
    }
}

impl TryFrom<u32> for RoundUpCap {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            10 => Ok(Self::Ten),
            50 => Ok(Self::Fifty),
            100 => Ok(Self::Hundred),
            _ => Err(format!("Round-up cap must be 10, 50 or 100 (got {})", value)),
        }
    }
}

impl From<RoundUpCap> for u32 {
    fn from(cap: RoundUpCap) -> Self {
        match cap {
            RoundUpCap::Ten => 10,
            RoundUpCap::Fifty => 50,
            RoundUpCap::Hundred => 100,
        }
    }
}

impl std::str::FromStr for RoundUpCap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid round-up cap: {}", s))?;
        Self::try_from(value)
    }
}

impl std::fmt::Display for RoundUpCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u32::from(*self))
    }
}

/// Non-fatal conditions noticed while scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringWarning {
    /// No transactions supplied; spending-based components fall back to neutral values
    NoTransactions,
    /// Fewer than two months of spending; stability collapses to a perfect score
    InsufficientHistory { months: usize },
}

impl std::fmt::Display for ScoringWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTransactions => write!(f, "no transactions supplied"),
            Self::InsufficientHistory { months } => write!(
                f,
                "only {} month(s) of spending; stability is not measurable",
                months
            ),
        }
    }
}

/// Financial Health Score with per-component breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialBehaviorScore {
    /// 0-100
    pub total_score: u8,
    pub breakdown: ScoreBreakdown,
    pub risk_profile: RiskProfile,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScoringWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub spending_stability: SpendingStability,
    pub emergency_buffer: EmergencyBuffer,
    pub subscription_burden: SubscriptionBurden,
    pub market_risk: MarketRisk,
}

impl ScoreBreakdown {
    /// Components as (display name, score), in weighting order
    pub fn named_scores(&self) -> [(&'static str, u8); 4] {
        [
            ("spending stability", self.spending_stability.score),
            ("emergency buffer", self.emergency_buffer.score),
            ("subscription management", self.subscription_burden.score),
            ("market risk tolerance", self.market_risk.score),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingStability {
    pub score: u8,
    pub weight: f64,
    pub coefficient_of_variation: f64,
    pub months_observed: usize,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyBuffer {
    pub score: u8,
    pub weight: f64,
    pub months_of_expenses: f64,
    pub liquid_savings: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionBurden {
    pub score: u8,
    pub weight: f64,
    pub percentage_of_income: f64,
    pub total_subscription_cost: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRisk {
    pub score: u8,
    pub weight: f64,
    pub volatility_index: f64,
    pub interpretation: String,
}

/// Per-subscription leak analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionAnalysis {
    pub subscription: Subscription,
    pub health_score: u8,
    pub usage_confidence: u8,
    pub cost_burden: u8,
    pub should_cancel: bool,
    pub cancel_confidence: u8,
    pub reasoning: String,
    pub potential_savings: f64,
}

/// Portfolio-level subscription health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionHealthScore {
    /// Mean per-subscription health, or 100 when nothing was detected
    pub total_score: u8,
    pub subscriptions: Vec<SubscriptionAnalysis>,
    pub total_monthly_waste: f64,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScoringWarning>,
}

impl SubscriptionHealthScore {
    /// Likelihood (0-100) that the subscription portfolio is leaking money
    pub fn leak_risk(&self) -> u8 {
        100 - self.total_score
    }

    /// Subscriptions flagged for cancellation
    pub fn flagged(&self) -> impl Iterator<Item = &SubscriptionAnalysis> {
        self.subscriptions.iter().filter(|s| s.should_cancel)
    }
}

/// Adaptive invest/hold decision for available spare change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentDecision {
    pub should_invest: bool,
    /// Recommended amount, rounded to cents
    pub amount: f64,
    /// Rounded health score
    pub aggression: u8,
    pub reasoning: String,
    pub spare_change: f64,
    /// 0.3-1.0 fraction of spare change to invest
    pub aggression_multiplier: f64,
    pub confidence_boost: f64,
    pub risk_level: RiskProfile,
    pub recommendations: Vec<String>,
}

impl InvestmentDecision {
    pub fn investment_percentage(&self) -> u32 {
        (self.aggression_multiplier * 100.0).round() as u32
    }
}

//! AutoVest Core Library
//!
//! Scoring and decision engine for the AutoVest personal finance assistant:
//! - Subscription detection from recurring transactions
//! - Financial Health Score (stability, emergency buffer, subscriptions, market risk)
//! - Subscription health and leak detection
//! - Adaptive spare-change investment decisions
//! - Plain-language explanations of every score
//! - Settings, profile/CSV import and demo profiles
//!
//! Scoring is synchronous and pure: results depend only on the profile and
//! the evaluation time held by a `ScoringEngine`.

pub mod analysis;
pub mod detect;
pub mod error;
pub mod explain;
pub mod import;
pub mod models;
pub mod sample;
pub mod scoring;
pub mod settings;
pub mod stats;

pub use analysis::{Explanations, FinancialAnalysis};
pub use detect::{detect_subscriptions, total_subscription_cost};
pub use error::{Error, Result};
pub use explain::{health_score_label, ExplanationGenerator};
pub use import::{
    load_profile, load_transactions_csv, parse_profile_json, parse_transactions_csv, ImportOptions,
};
pub use models::{
    FinancialBehaviorScore, Frequency, InvestmentDecision, RiskProfile, RoundUpCap,
    ScoreBreakdown, ScoringWarning, Subscription, SubscriptionAnalysis, SubscriptionHealthScore,
    Transaction, UserFinancialProfile,
};
pub use sample::SampleKind;
pub use scoring::{
    calculate_financial_health_score, calculate_subscription_health_score,
    determine_investment_mode, ScoringConfig, ScoringEngine,
};
pub use settings::{InsightLevel, Settings};
pub use stats::{calculate_spare_change, total_spare_change};

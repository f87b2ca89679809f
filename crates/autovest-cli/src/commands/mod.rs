//! Command implementations for the AutoVest CLI
//!
//! This module contains all the command handler functions.
//! Commands are organized into submodules by functionality:
//! - `analyze`: Full analysis, health and subscription reports
//! - `invest`: Spare-change investment decisions and single round-ups
//! - `sample`: Demo profile output
//! - `config`: Effective settings

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use autovest_core::{
    import, ExplanationGenerator, RoundUpCap, ScoringEngine, Settings, UserFinancialProfile,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::cli::{Cli, ProfileArgs};

pub mod analyze;
pub mod config;
pub mod invest;
pub mod sample;

pub use analyze::*;
pub use config::*;
pub use invest::*;
pub use sample::*;

/// Everything a command needs besides its own arguments
pub struct Context {
    pub settings: Settings,
    pub engine: ScoringEngine,
    pub json: bool,
    /// Settings file given with --config
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Resolve settings and the evaluation time from the global flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
        let as_of = parse_as_of(cli.as_of.as_deref())?;
        let mut ctx = Self::new(settings, as_of, cli.json);
        ctx.config_path = cli.config.clone();
        Ok(ctx)
    }

    pub fn new(settings: Settings, as_of: DateTime<Utc>, json: bool) -> Self {
        let engine = ScoringEngine::with_config(settings.scoring_config(), as_of);
        Self {
            settings,
            engine,
            json,
            config_path: None,
        }
    }

    pub fn explainer(&self) -> ExplanationGenerator {
        ExplanationGenerator::from(self.engine.config())
    }

    pub fn today(&self) -> NaiveDate {
        self.engine.as_of().date_naive()
    }

    /// Format an amount with the configured currency symbol
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.settings.currency_symbol, amount)
    }
}

/// Parse `--as-of`, defaulting to now
pub fn parse_as_of(value: Option<&str>) -> Result<DateTime<Utc>> {
    match value {
        Some(s) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid --as-of date: {} (use YYYY-MM-DD)", s))?;
            Ok(autovest_core::stats::start_of_day(date))
        }
        None => Ok(Utc::now()),
    }
}

/// Parse `--cap`, defaulting to the configured cap
pub fn parse_cap(ctx: &Context, value: Option<&str>) -> Result<RoundUpCap> {
    match value {
        Some(s) => s.parse::<RoundUpCap>().map_err(|e| anyhow::anyhow!(e)),
        None => Ok(ctx.settings.round_up_cap),
    }
}

/// Build the profile named by the profile flags
pub fn load_profile(ctx: &Context, args: &ProfileArgs) -> Result<UserFinancialProfile> {
    let mut profile = match (&args.profile, &args.transactions) {
        (Some(path), _) => import::load_profile(path)
            .with_context(|| format!("Failed to load profile from {}", path.display()))?,
        (None, Some(path)) => profile_from_csv(ctx, args, path)?,
        (None, None) => bail!("No profile given. Use --profile FILE.json or --transactions FILE.csv"),
    };

    if let Some(volatility) = args.volatility {
        profile.market_volatility = Some(volatility);
    } else if profile.market_volatility.is_none() {
        profile.market_volatility = Some(ctx.settings.market_volatility);
    }
    profile.validate()?;

    debug!(
        transactions = profile.transactions.len(),
        volatility = profile.market_volatility(),
        "Profile ready"
    );
    Ok(profile)
}

fn profile_from_csv(ctx: &Context, args: &ProfileArgs, path: &Path) -> Result<UserFinancialProfile> {
    let (Some(income), Some(savings), Some(expenses)) = (args.income, args.savings, args.expenses)
    else {
        bail!("--transactions needs --income, --savings and --expenses");
    };

    let options = ctx.settings.import_options()?;
    let transactions = import::load_transactions_csv(path, &options)
        .with_context(|| format!("Failed to import {}", path.display()))?;

    Ok(UserFinancialProfile {
        monthly_income: income,
        liquid_savings: savings,
        monthly_expenses: expenses,
        transactions,
        market_volatility: None,
    })
}

/// Print a value as pretty JSON
pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

/// Truncate string to max length with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// AutoVest - Score financial health and invest spare change adaptively
#[derive(Parser)]
#[command(name = "autovest")]
#[command(about = "Financial health scoring and spare-change investment decisions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the financial profile comes from
///
/// Either a full profile as JSON, or a transaction CSV plus the balance
/// figures the CSV cannot carry.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Profile JSON file
    #[arg(short, long, conflicts_with = "transactions")]
    pub profile: Option<PathBuf>,

    /// Transaction CSV (date, amount, merchant[, id, category, description, is_recurring])
    #[arg(short, long)]
    pub transactions: Option<PathBuf>,

    /// Monthly income (with --transactions)
    #[arg(long, requires = "transactions")]
    pub income: Option<f64>,

    /// Liquid savings (with --transactions)
    #[arg(long, requires = "transactions")]
    pub savings: Option<f64>,

    /// Monthly expenses (with --transactions)
    #[arg(long, requires = "transactions")]
    pub expenses: Option<f64>,

    /// Market volatility index 0-1 (defaults to the profile's, then settings)
    #[arg(long)]
    pub volatility: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full analysis: health, subscriptions and the spare-change decision
    Analyze {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Round-up cap: 10, 50 or 100 (defaults to settings)
        #[arg(long)]
        cap: Option<String>,
    },

    /// Financial Health Score with its breakdown
    Health {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Subscription health and cancellation candidates
    Subscriptions {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Decide whether and how much spare change to invest
    Invest {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Spare change available (defaults to the round-ups of the profile's transactions)
        #[arg(long)]
        spare_change: Option<f64>,

        /// Round-up cap: 10, 50 or 100 (defaults to settings)
        #[arg(long)]
        cap: Option<String>,
    },

    /// Spare change from rounding a single purchase up
    SpareChange {
        /// Purchase amount
        amount: f64,

        /// Round-up cap: 10, 50 or 100 (defaults to settings)
        #[arg(long)]
        cap: Option<String>,
    },

    /// Write a demo profile as JSON
    Sample {
        /// Profile kind: demo, healthy, struggling
        #[arg(short, long, default_value = "demo")]
        kind: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show effective settings
    Config,
}

//! AutoVest CLI - Financial health scoring and spare-change investing
//!
//! Usage:
//!   autovest analyze --profile FILE.json      Score a profile and decide on its spare change
//!   autovest health --transactions FILE.csv   Financial Health Score breakdown
//!   autovest subscriptions --profile FILE     Subscription health and leak detection
//!   autovest spare-change 143 --cap 50        Round-up for a single purchase
//!   autovest sample --kind healthy            Write a demo profile

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let ctx = commands::Context::from_cli(&cli)?;

    match cli.command {
        Commands::Analyze { profile, cap } => commands::cmd_analyze(&ctx, &profile, cap.as_deref()),
        Commands::Health { profile } => commands::cmd_health(&ctx, &profile),
        Commands::Subscriptions { profile } => commands::cmd_subscriptions(&ctx, &profile),
        Commands::Invest {
            profile,
            spare_change,
            cap,
        } => commands::cmd_invest(&ctx, &profile, spare_change, cap.as_deref()),
        Commands::SpareChange { amount, cap } => {
            commands::cmd_spare_change(&ctx, amount, cap.as_deref())
        }
        Commands::Sample { kind, output } => {
            commands::cmd_sample(&ctx, &kind, output.as_deref())
        }
        Commands::Config => commands::cmd_config(&ctx),
    }
}

//! Investment command implementations (invest, spare-change)

use anyhow::{bail, Result};
use autovest_core::{calculate_spare_change, total_spare_change, InsightLevel, RoundUpCap};
use serde_json::json;
use tracing::debug;

use super::{load_profile, parse_cap, print_json, Context};
use crate::cli::ProfileArgs;

pub fn cmd_invest(
    ctx: &Context,
    args: &ProfileArgs,
    spare_change: Option<f64>,
    cap: Option<&str>,
) -> Result<()> {
    let profile = load_profile(ctx, args)?;
    let health = ctx.engine.financial_health(&profile)?;

    // Without an explicit amount, pool the round-ups of the profile's purchases
    let spare_change = match spare_change {
        Some(amount) => amount,
        None => {
            let cap = parse_cap(ctx, cap)?;
            let pooled = total_spare_change(&profile.transactions, cap);
            debug!(pooled, cap = %cap, "Pooled spare change from transactions");
            pooled
        }
    };

    let decision = ctx.engine.investment_decision(
        f64::from(health.total_score),
        spare_change,
        &profile,
    )?;

    if ctx.json {
        return print_json(&serde_json::to_value(&decision)?);
    }

    println!();
    if decision.should_invest {
        println!(
            "📈 Invest {} of {} spare change",
            ctx.money(decision.amount),
            ctx.money(decision.spare_change)
        );
    } else {
        println!("🛑 Hold {} spare change", ctx.money(decision.spare_change));
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", decision.reasoning);
    println!(
        "   Health {}/100 │ mode {} │ multiplier {:.2} │ boost {:.2}",
        decision.aggression,
        decision.risk_level.investment_mode(),
        decision.aggression_multiplier,
        decision.confidence_boost
    );
    for rec in &decision.recommendations {
        println!("   • {}", rec);
    }

    if ctx.settings.insight_level != InsightLevel::Basic {
        println!();
        println!(
            "{}",
            ctx.explainer().investment(&decision, health.total_score)
        );
    }

    Ok(())
}

pub fn cmd_spare_change(ctx: &Context, amount: f64, cap: Option<&str>) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("Amount must be a non-negative number (got {})", amount);
    }

    // With no --cap, show every cap side by side
    let caps: Vec<RoundUpCap> = match cap {
        Some(_) => vec![parse_cap(ctx, cap)?],
        None => RoundUpCap::all().to_vec(),
    };

    let rows: Vec<(RoundUpCap, f64)> = caps
        .into_iter()
        .map(|cap| (cap, calculate_spare_change(amount, cap)))
        .collect();

    if ctx.json {
        let rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|(cap, spare)| {
                json!({
                    "amount": amount,
                    "round_up_cap": cap,
                    "spare_change": spare,
                })
            })
            .collect();
        return print_json(&serde_json::Value::Array(rows));
    }

    println!();
    println!("🪙 Spare change for a {} purchase", ctx.money(amount));
    for (cap, spare) in rows {
        println!(
            "   Round up to {:>3}: {} → {}",
            cap,
            ctx.money(amount + spare),
            ctx.money(spare)
        );
    }

    Ok(())
}

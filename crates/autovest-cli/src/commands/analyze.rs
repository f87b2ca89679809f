//! Scoring command implementations (analyze, health, subscriptions)

use anyhow::Result;
use autovest_core::{
    health_score_label, FinancialBehaviorScore, InsightLevel, ScoringWarning,
    SubscriptionHealthScore,
};
use serde_json::json;

use super::{load_profile, parse_cap, print_json, truncate, Context};
use crate::cli::ProfileArgs;

pub fn cmd_analyze(ctx: &Context, args: &ProfileArgs, cap: Option<&str>) -> Result<()> {
    let profile = load_profile(ctx, args)?;
    let cap = parse_cap(ctx, cap)?;
    let analysis = ctx.engine.analyze(&profile, cap)?;
    let explanations = analysis.explanations(&ctx.explainer(), ctx.settings.insight_level);

    if ctx.json {
        return print_json(&json!({
            "analysis": analysis,
            "explanations": explanations,
        }));
    }

    let decision = &analysis.investment_decision;

    println!();
    println!("📊 AutoVest Analysis ({})", ctx.today());
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Financial Health:     {:>3}/100  {}",
        analysis.health_score(),
        health_score_label(f64::from(analysis.health_score()))
    );
    println!(
        "   Subscription Health:  {:>3}/100  (leak risk {}%)",
        analysis.subscription_health_score.total_score,
        analysis.leak_risk()
    );
    println!("   Investment Mode:      {}", analysis.investment_mode());
    println!(
        "   Spare Change:         {} (round up to {})",
        ctx.money(analysis.spare_change),
        analysis.round_up_cap
    );
    if decision.should_invest {
        println!(
            "   Invest:               {} ({}%)",
            ctx.money(decision.amount),
            decision.investment_percentage()
        );
    } else {
        println!("   Invest:               paused");
    }
    if analysis.potential_monthly_savings() > 0.0 {
        println!(
            "   Potential Savings:    {}/month",
            ctx.money(analysis.potential_monthly_savings())
        );
    }
    print_warnings(&analysis.financial_behavior_score.warnings);

    println!();
    println!("{}", explanations.summary);
    for text in [
        &explanations.health,
        &explanations.subscriptions,
        &explanations.investment,
    ]
    .into_iter()
    .flatten()
    {
        println!();
        println!("{}", text);
    }

    Ok(())
}

pub fn cmd_health(ctx: &Context, args: &ProfileArgs) -> Result<()> {
    let profile = load_profile(ctx, args)?;
    let score = ctx.engine.financial_health(&profile)?;

    if ctx.json {
        return print_json(&serde_json::to_value(&score)?);
    }

    print_health(ctx, &score);

    if ctx.settings.insight_level != InsightLevel::Basic {
        println!();
        println!("{}", ctx.explainer().health_score(&score));
    }

    Ok(())
}

fn print_health(ctx: &Context, score: &FinancialBehaviorScore) {
    let breakdown = &score.breakdown;

    println!();
    println!(
        "💪 Financial Health Score: {}/100 ({})",
        score.total_score,
        score.risk_profile.label()
    );
    println!("   ─────────────────────────────────────────────────────────────");

    let rows = [
        (
            "Spending stability",
            breakdown.spending_stability.score,
            breakdown.spending_stability.weight,
            &breakdown.spending_stability.interpretation,
        ),
        (
            "Emergency buffer",
            breakdown.emergency_buffer.score,
            breakdown.emergency_buffer.weight,
            &breakdown.emergency_buffer.interpretation,
        ),
        (
            "Subscription burden",
            breakdown.subscription_burden.score,
            breakdown.subscription_burden.weight,
            &breakdown.subscription_burden.interpretation,
        ),
        (
            "Market risk",
            breakdown.market_risk.score,
            breakdown.market_risk.weight,
            &breakdown.market_risk.interpretation,
        ),
    ];
    for (name, value, weight, interpretation) in rows {
        println!(
            "   {:20} │ {:>3} × {:.2} │ {}",
            name, value, weight, interpretation
        );
    }

    println!();
    println!(
        "   Savings cover {:.1} months of expenses; subscriptions cost {} ({:.1}% of income)",
        breakdown.emergency_buffer.months_of_expenses,
        ctx.money(breakdown.subscription_burden.total_subscription_cost),
        breakdown.subscription_burden.percentage_of_income
    );

    if !score.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &score.recommendations {
            println!("   • {}", rec);
        }
    }
    print_warnings(&score.warnings);
}

pub fn cmd_subscriptions(ctx: &Context, args: &ProfileArgs) -> Result<()> {
    let profile = load_profile(ctx, args)?;
    let health = ctx.engine.subscription_health(&profile)?;

    if ctx.json {
        return print_json(&serde_json::to_value(&health)?);
    }

    print_subscriptions(ctx, &health);

    if ctx.settings.insight_level != InsightLevel::Basic {
        println!();
        println!("{}", ctx.explainer().subscription_health(&health));
    }

    Ok(())
}

fn print_subscriptions(ctx: &Context, health: &SubscriptionHealthScore) {
    if health.subscriptions.is_empty() {
        println!("No subscriptions detected. Subscriptions need at least two recurring charges from the same merchant.");
        return;
    }

    println!();
    println!(
        "📋 Subscription Health: {}/100 (leak risk {}%)",
        health.total_score,
        health.leak_risk()
    );
    println!("   ─────────────────────────────────────────────────────────────");

    let explainer = ctx.explainer();
    for analysis in &health.subscriptions {
        let sub = &analysis.subscription;
        let icon = if analysis.should_cancel { "⚠️ " } else { "✅" };

        println!(
            "   {} {:20} │ {:>9}/{:<7} │ health {:>3} │ last charge {} ({} days ago)",
            icon,
            truncate(&sub.merchant, 20),
            ctx.money(sub.amount),
            sub.frequency.as_str(),
            analysis.health_score,
            sub.last_charge,
            sub.days_since_last_use
        );
        if analysis.should_cancel {
            println!(
                "      Cancel? {}% - {}",
                analysis.cancel_confidence,
                explainer.confidence(f64::from(analysis.cancel_confidence))
            );
            println!("      {}", analysis.reasoning);
        }
    }

    if !health.recommendations.is_empty() {
        println!();
        for rec in &health.recommendations {
            println!("   💡 {}", rec);
        }
    }
}

fn print_warnings(warnings: &[ScoringWarning]) {
    for warning in warnings {
        println!("   ⚠️  Note: {}", warning);
    }
}

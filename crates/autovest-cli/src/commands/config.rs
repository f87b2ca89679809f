//! Settings command

use anyhow::Result;
use autovest_core::settings::default_settings_path;
use serde_json::json;

use super::{print_json, Context};

pub fn cmd_config(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;

    if ctx.json {
        return print_json(&json!({
            "currency_symbol": settings.currency_symbol,
            "insight_level": settings.insight_level.as_str(),
            "round_up_cap": settings.round_up_cap,
            "recurring_category_pattern": settings.recurring_category_pattern,
            "market_volatility": settings.market_volatility,
        }));
    }

    println!();
    println!("⚙️  AutoVest Settings");
    println!("   ─────────────────────────────────────────────────────────────");
    match (&ctx.config_path, default_settings_path()) {
        (Some(path), _) => println!("   Settings file: {}", path.display()),
        (None, Some(path)) if path.exists() => println!("   Override file: {}", path.display()),
        (None, Some(path)) => println!("   Override file: {} (not present)", path.display()),
        (None, None) => println!("   Override file: (no data directory on this platform)"),
    }
    println!("   Evaluating as of: {}", ctx.today());
    println!();
    print!("{}", settings.to_toml()?);

    Ok(())
}

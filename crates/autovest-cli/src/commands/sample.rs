//! Demo profile command

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use autovest_core::{sample, SampleKind};

use super::Context;

pub fn cmd_sample(ctx: &Context, kind: &str, output: Option<&Path>) -> Result<()> {
    let kind: SampleKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let profile = sample::profile(kind, ctx.today());
    let json = serde_json::to_string_pretty(&profile).context("Failed to serialize profile")?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✅ Wrote {} profile ({} transactions) to {}",
                kind,
                profile.transactions.len(),
                path.display()
            );
            eprintln!("   Try: autovest analyze --profile {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

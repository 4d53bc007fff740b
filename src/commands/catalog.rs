use std::path::Path;

use anyhow::{Context, Result};
use catezile_core::config::SiteConfig;
use catezile_core::source::{Catalog, CountdownTarget};
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::render::render_target_row;

pub fn run(config: &SiteConfig, file: &Path, upcoming: bool, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let ctx = config.source_context()?;
    let catalog = Catalog::from_json(&content, &ctx)?;

    let now = Utc::now();
    let window = config.live_window()?;
    let targets: Vec<&CountdownTarget> = if upcoming {
        catalog.upcoming(now, window).collect()
    } else {
        catalog.targets.iter().collect()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
        return Ok(());
    }

    if targets.is_empty() {
        println!("{}", "No countdowns found".dimmed());
    }

    for target in &targets {
        let state = target.countdown(window).state_at(now);
        println!(
            "{}",
            render_target_row(target, &state, now, ctx.timezone, &config.locale)
        );
    }

    if catalog.skipped > 0 {
        println!();
        println!(
            "{}",
            format!("{} item(s) skipped, run with -v for details", catalog.skipped).yellow()
        );
    }

    Ok(())
}

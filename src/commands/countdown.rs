use anyhow::Result;
use catezile_core::config::SiteConfig;
use catezile_core::format::{DisplayPattern, format_localized_in};
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(config: &SiteConfig, target: &str, live: bool, title: Option<&str>) -> Result<()> {
    let countdown = super::countdown_for(config, target, live, None)?;

    let when = format_localized_in(
        countdown.target,
        DisplayPattern::Long,
        &config.locale,
        config.timezone()?,
    )?;
    if let Some(title) = title {
        println!("{}", title.bold());
    }
    println!("{}", when.dimmed());
    println!("{}", countdown.state_at(Utc::now()).render(&config.locale));

    Ok(())
}

pub mod catalog;
pub mod config;
pub mod countdown;
pub mod ics;
pub mod show;
pub mod watch;

use anyhow::{Context, Result};
use catezile_core::config::SiteConfig;
use catezile_core::countdown::Countdown;
use catezile_core::instant::InstantInput;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Resolve a command-line instant (ISO-8601 or epoch milliseconds) in `tz`.
pub fn resolve_instant(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    InstantInput::from(input)
        .resolve_in(tz)
        .with_context(|| format!("Invalid instant '{}'", input))
}

/// Countdown to `target` with the configured timezone, and the configured
/// live window unless `live_window` overrides it.
pub fn countdown_for(
    config: &SiteConfig,
    target: &str,
    live: bool,
    live_window: Option<std::time::Duration>,
) -> Result<Countdown> {
    let window = match live_window {
        Some(w) => chrono::Duration::from_std(w).context("Live window is too large")?,
        None => config.live_window()?,
    };
    let target_at = resolve_instant(target, config.timezone()?)
        .with_context(|| format!("Invalid countdown target '{}'", target))?;

    Ok(Countdown::new(target_at, live).with_live_window(window))
}

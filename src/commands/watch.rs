use std::io::Write;

use anyhow::Result;
use catezile_core::config::SiteConfig;
use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::render::Render;

const TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Redraw the countdown in place once per second.
///
/// The timer lives only as long as this function: it stops when the target
/// has elapsed or on Ctrl-C.
pub async fn run(
    config: &SiteConfig,
    target: &str,
    live: bool,
    live_window: Option<std::time::Duration>,
) -> Result<()> {
    let countdown = super::countdown_for(config, target, live, live_window)?;

    let mut ticker = interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stdout = std::io::stdout();

    // One handler for the whole loop so a signal between ticks is not lost
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = countdown.state_at(Utc::now());
                // \x1b[2K clears the line before redrawing
                write!(stdout, "\r\x1b[2K{}", state.render(&config.locale))?;
                stdout.flush()?;

                if state.is_elapsed() {
                    writeln!(stdout)?;
                    debug!("Target elapsed, stopping timer");
                    return Ok(());
                }
            }
            _ = &mut ctrl_c => {
                writeln!(stdout)?;
                debug!("Interrupted, stopping timer");
                return Ok(());
            }
        }
    }
}

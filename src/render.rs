//! TUI rendering traits for catezile types.
//!
//! Extension traits that add colored terminal rendering to catezile-core
//! types using owo_colors.

use catezile_core::countdown::{CountdownState, render_state};
use catezile_core::format::{DisplayPattern, format_localized_in, relative_label};
use catezile_core::source::{CountdownTarget, TargetKind};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self, locale: &str) -> String;
}

impl Render for CountdownState {
    fn render(&self, locale: &str) -> String {
        let text = render_state(self, locale);
        match self {
            CountdownState::Pending(_) => text.bold().to_string(),
            CountdownState::Live => text.red().bold().to_string(),
            CountdownState::Elapsed => text.dimmed().to_string(),
        }
    }
}

impl Render for TargetKind {
    fn render(&self, _locale: &str) -> String {
        match self {
            TargetKind::Event => "🎫",
            TargetKind::Movie => "🎬",
            TargetKind::Match => "⚽",
            TargetKind::Holiday => "📅",
        }
        .to_string()
    }
}

/// One catalog row: icon, title, start date, relative label, countdown.
pub fn render_target_row(
    target: &CountdownTarget,
    state: &CountdownState,
    now: DateTime<Utc>,
    tz: Tz,
    locale: &str,
) -> String {
    let when = format_localized_in(target.start, DisplayPattern::DateTime, locale, tz)
        .unwrap_or_else(|_| target.start.to_rfc3339());
    let relative = relative_label(target.start, now, locale);

    format!(
        "{} {}  {} {}\n     {}",
        target.kind.render(locale),
        target.title.bold(),
        when.dimmed(),
        format!("({})", relative).dimmed(),
        state.render(locale)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use catezile_core::countdown::compute_state;
    use chrono::{Duration, TimeZone};

    fn derby() -> CountdownTarget {
        let start = Utc.with_ymd_and_hms(2025, 8, 12, 15, 0, 0).unwrap();
        CountdownTarget {
            title: "FCSB – Dinamo".to_string(),
            kind: TargetKind::Match,
            start,
            end: Some(start + Duration::hours(2)),
            url: None,
            live_capable: true,
        }
    }

    #[test]
    fn test_render_target_row_shows_title_date_and_state() {
        let target = derby();
        let now = target.start - Duration::days(3);
        let state = compute_state(now, target.start, true);

        let row = render_target_row(&target, &state, now, chrono_tz::Europe::Bucharest, "ro");

        assert!(row.contains("FCSB – Dinamo"), "Row: {}", row);
        assert!(row.contains("12 august 2025, 18:00"), "Row: {}", row);
        assert!(row.contains("peste 3 zile"), "Row: {}", row);
        assert!(row.contains("3 zile 00:00:00"), "Row: {}", row);
    }

    #[test]
    fn test_live_state_renders_live_label() {
        let rendered = CountdownState::Live.render("en");
        assert!(rendered.contains("LIVE"), "Got: {}", rendered);
    }
}

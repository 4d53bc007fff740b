use std::path::Path;

use anyhow::{Context, Result};
use catezile_core::config::SiteConfig;
use catezile_core::ics::{CalendarEvent, build_calendar_file_with};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

pub fn run(
    config: &SiteConfig,
    title: String,
    start: &str,
    end: Option<String>,
    url: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let payload = build_payload(config, title, start, end.as_deref(), url, Utc::now())?;

    match output {
        Some(path) => {
            std::fs::write(path, &payload)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!("{}", format!("  Saved: {}", path.display()).green());
        }
        None => print!("{}", payload),
    }

    Ok(())
}

fn build_payload(
    config: &SiteConfig,
    title: String,
    start: &str,
    end: Option<&str>,
    url: Option<String>,
    now: DateTime<Utc>,
) -> Result<String> {
    let tz = config.timezone()?;
    let start = super::resolve_instant(start, tz).context("Invalid start")?;
    let end = end
        .map(|e| super::resolve_instant(e, tz))
        .transpose()
        .context("Invalid end")?;

    let event = CalendarEvent::new(title, start, end, url)?;
    Ok(build_calendar_file_with(&event, now, &config.export_options()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catezile_core::ics::parse_calendar_file;
    use chrono::TimeZone;

    #[test]
    fn test_payload_resolves_site_time_and_epoch_millis() {
        let config = SiteConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();

        let payload = build_payload(
            &config,
            "FCSB – Dinamo".to_string(),
            "2025-08-12T18:00",
            Some("1755018000000"),
            None,
            now,
        )
        .unwrap();

        assert!(payload.contains("DTSTART:20250812T150000Z"), "{}", payload);
        assert!(payload.contains("DTEND:20250812T170000Z"), "{}", payload);
        assert!(payload.contains("PRODID:-//CateZile.ro//EN"), "{}", payload);
    }

    #[test]
    fn test_payload_rejects_backwards_or_malformed_times() {
        let config = SiteConfig::default();
        let now = Utc::now();

        let backwards = build_payload(
            &config,
            "X".to_string(),
            "2025-08-12T18:00",
            Some("2025-08-12T17:00"),
            None,
            now,
        );
        assert!(backwards.is_err());

        let malformed = build_payload(&config, "X".to_string(), "mâine", None, None, now);
        assert!(malformed.is_err());
    }

    #[test]
    fn test_run_writes_importable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("untold.ics");

        run(
            &SiteConfig::default(),
            "UNTOLD 2025".to_string(),
            "2025-08-07T18:00",
            None,
            Some("https://catezile.ro/e/untold".to_string()),
            Some(&path),
        )
        .unwrap();

        let event = parse_calendar_file(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(event.title(), "UNTOLD 2025");
        assert_eq!(event.start(), Utc.with_ymd_and_hms(2025, 8, 7, 15, 0, 0).unwrap());
        assert_eq!(event.url(), Some("https://catezile.ro/e/untold"));
    }
}

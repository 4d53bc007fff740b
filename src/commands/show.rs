use anyhow::Result;
use catezile_core::config::SiteConfig;
use catezile_core::format::{
    DisplayPattern, format_localized_in, relative_label, zone_abbreviation,
};
use chrono::Utc;
use chrono_tz::Tz;
use owo_colors::OwoColorize;

pub fn run(
    config: &SiteConfig,
    instant: &str,
    pattern: DisplayPattern,
    locale: Option<&str>,
    tz: Option<&str>,
) -> Result<()> {
    let locale = locale.unwrap_or(&config.locale);
    let tz_name = tz.unwrap_or(&config.timezone);
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown timezone '{}'", tz_name))?;

    let resolved = super::resolve_instant(instant, tz)?;
    let now = Utc::now();

    let formatted = format_localized_in(resolved, pattern, locale, tz)?;
    println!(
        "{} {}",
        formatted.bold(),
        zone_abbreviation(resolved, tz_name).dimmed()
    );
    println!("{}", relative_label(resolved, now, locale));
    println!("{} {}", "UTC:".dimmed(), resolved.to_rfc3339());

    // The viewer's zone can differ from the site's; show both when it does
    if let Ok(local_name) = iana_time_zone::get_timezone() {
        if local_name != tz_name {
            if let Ok(local_tz) = local_name.parse::<Tz>() {
                let local =
                    format_localized_in(resolved, DisplayPattern::DateTime, locale, local_tz)?;
                println!(
                    "{} {} {}",
                    "Local:".dimmed(),
                    local,
                    zone_abbreviation(resolved, &local_name).dimmed()
                );
            }
        }
    }

    Ok(())
}

//! Display formatting for instants.
//!
//! Localized rendering in the site timezone, timezone abbreviations and
//! relative labels, plus the RFC 5545 text helpers the calendar exporter uses.

use std::str::FromStr;

use chrono::{DateTime, Duration, Locale, Offset, TimeZone, Utc};
use chrono_tz::{OffsetName, Tz};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CateZileError, CateZileResult};
use crate::instant::{InstantInput, SITE_TIMEZONE};

/// Label returned when a timezone cannot be looked up at all.
pub const FALLBACK_ZONE_ABBREVIATION: &str = "EET";

/// UTC basic format used for calendar-file timestamps.
pub const ICS_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// How an instant is laid out for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPattern {
    /// `12 august 2025`
    #[default]
    Date,
    /// `12 august 2025, 18:00`
    DateTime,
    /// `18:00`
    Time,
    /// `marți, 12 august 2025, 18:00`
    Long,
    /// `12.08.2025`
    Numeric,
}

impl DisplayPattern {
    fn format_str(self) -> &'static str {
        match self {
            DisplayPattern::Date => "%-d %B %Y",
            DisplayPattern::DateTime => "%-d %B %Y, %H:%M",
            DisplayPattern::Time => "%H:%M",
            DisplayPattern::Long => "%A, %-d %B %Y, %H:%M",
            DisplayPattern::Numeric => "%d.%m.%Y",
        }
    }
}

impl FromStr for DisplayPattern {
    type Err = CateZileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(DisplayPattern::Date),
            "datetime" => Ok(DisplayPattern::DateTime),
            "time" => Ok(DisplayPattern::Time),
            "long" => Ok(DisplayPattern::Long),
            "numeric" => Ok(DisplayPattern::Numeric),
            other => Err(CateZileError::invalid(format!(
                "Unknown pattern '{}'. Expected date, datetime, time, long or numeric",
                other
            ))),
        }
    }
}

/// Map a locale tag (`ro`, `ro-RO`, `en_US`, ...) to chrono's locale tables.
///
/// Unknown tags fall back to Romanian.
pub fn resolve_locale(tag: &str) -> Locale {
    let normalized = tag.trim().replace('-', "_");
    match normalized.to_ascii_lowercase().as_str() {
        "" | "ro" | "ro_ro" => return Locale::ro_RO,
        "en" | "en_us" => return Locale::en_US,
        _ => {}
    }

    Locale::try_from(normalized.as_str()).unwrap_or_else(|_| {
        debug!(locale = tag, "Unknown locale, falling back to ro_RO");
        Locale::ro_RO
    })
}

fn is_romanian(locale: Locale) -> bool {
    matches!(locale, Locale::ro_RO)
}

/// Render an instant in the site timezone.
pub fn format_localized(
    instant: impl Into<InstantInput>,
    pattern: DisplayPattern,
    locale: &str,
) -> CateZileResult<String> {
    format_localized_in(instant, pattern, locale, SITE_TIMEZONE)
}

/// Render an instant as wall-clock time in `tz`.
pub fn format_localized_in(
    instant: impl Into<InstantInput>,
    pattern: DisplayPattern,
    locale: &str,
    tz: Tz,
) -> CateZileResult<String> {
    let instant = instant.into().resolve_in(tz)?;
    let local = instant.with_timezone(&tz);
    Ok(local
        .format_localized(pattern.format_str(), resolve_locale(locale))
        .to_string())
}

/// Short timezone label (e.g. `EET` / `EEST`) in effect at `instant`.
///
/// Never fails: an unknown zone yields [`FALLBACK_ZONE_ABBREVIATION`], and a
/// zone without a letter abbreviation yields its offset (`GMT+4`).
pub fn zone_abbreviation(instant: DateTime<Utc>, timezone: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(e) => {
            warn!(timezone, error = %e, "Timezone lookup failed, using fallback label");
            return FALLBACK_ZONE_ABBREVIATION.to_string();
        }
    };

    let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
    match offset.abbreviation() {
        Some(abbr) => abbr.to_string(),
        None => {
            let label = offset_label(offset.fix().local_minus_utc());
            debug!(timezone, %label, "No abbreviation in tz database, using offset");
            label
        }
    }
}

/// `GMT`, `GMT+3`, `GMT-3:30` for an offset in seconds east of UTC.
pub fn offset_label(offset_seconds: i32) -> String {
    if offset_seconds == 0 {
        return "GMT".to_string();
    }
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let total_minutes = offset_seconds.unsigned_abs() / 60;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if minutes == 0 {
        format!("GMT{}{}", sign, hours)
    } else {
        format!("GMT{}{}:{:02}", sign, hours, minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    Day,
    Hour,
    Minute,
}

/// Romanian counted noun: `o zi`, `3 zile`, `20 de zile`, `101 zile`.
pub(crate) fn ro_quantity(n: u64, unit: Unit) -> String {
    let (one, many) = match unit {
        Unit::Day => ("o zi", "zile"),
        Unit::Hour => ("o oră", "ore"),
        Unit::Minute => ("un minut", "minute"),
    };
    let tail = n % 100;
    if n == 1 {
        one.to_string()
    } else if tail == 0 || tail >= 20 {
        format!("{} de {}", n, many)
    } else {
        format!("{} {}", n, many)
    }
}

pub(crate) fn en_quantity(n: u64, unit: Unit) -> String {
    let word = match unit {
        Unit::Day => "day",
        Unit::Hour => "hour",
        Unit::Minute => "minute",
    };
    if n == 1 {
        format!("1 {}", word)
    } else {
        format!("{} {}s", n, word)
    }
}

pub(crate) fn quantity(n: u64, unit: Unit, locale: Locale) -> String {
    if is_romanian(locale) {
        ro_quantity(n, unit)
    } else {
        en_quantity(n, unit)
    }
}

/// Human label relative to `now`: `peste 3 zile`, `acum 2 ore` / `in 3 days`, `2 hours ago`.
///
/// Uses the largest whole unit among days, hours and minutes. Under a minute is "now".
pub fn relative_label(instant: DateTime<Utc>, now: DateTime<Utc>, locale: &str) -> String {
    let locale = resolve_locale(locale);
    let delta = instant - now;
    let future = delta > Duration::zero();
    let abs = delta.abs();

    let (n, unit) = if abs.num_days() >= 1 {
        (abs.num_days(), Unit::Day)
    } else if abs.num_hours() >= 1 {
        (abs.num_hours(), Unit::Hour)
    } else if abs.num_minutes() >= 1 {
        (abs.num_minutes(), Unit::Minute)
    } else {
        let now_word = if is_romanian(locale) { "acum" } else { "now" };
        return now_word.to_string();
    };

    let amount = quantity(n.unsigned_abs(), unit, locale);
    match (is_romanian(locale), future) {
        (true, true) => format!("peste {}", amount),
        (true, false) => format!("acum {}", amount),
        (false, true) => format!("in {}", amount),
        (false, false) => format!("{} ago", amount),
    }
}

/// Format an instant in UTC basic format (`20250812T150000Z`).
pub fn format_utc_basic(instant: DateTime<Utc>) -> String {
    instant.format(ICS_UTC_FORMAT).to_string()
}

/// Escape calendar-file TEXT: backslash, semicolon, comma and newlines.
///
/// Carriage returns are dropped so `\r\n` in the input becomes a single `\n`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_text`].
pub fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}

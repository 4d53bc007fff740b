//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::parser::{Property, read_calendar, unfold};

use crate::error::{CateZileError, CateZileResult};
use crate::format::{ICS_UTC_FORMAT, unescape_text};
use crate::ics::CalendarEvent;

/// Read the first VEVENT of a calendar file back into a [`CalendarEvent`].
///
/// Accepts CRLF or bare LF line endings.
pub fn parse_calendar_file(content: &str) -> CateZileResult<CalendarEvent> {
    let normalized = content.replace("\r\n", "\n").replace('\n', "\r\n");
    let unfolded = unfold(&normalized);
    let calendar = read_calendar(&unfolded).map_err(|e| CateZileError::IcsParse(e.to_string()))?;

    let vevent = calendar
        .components
        .iter()
        .find(|c| c.name == "VEVENT")
        .ok_or_else(|| CateZileError::IcsParse("No VEVENT in calendar file".into()))?;

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_default();
    let start = utc_prop(vevent.find_prop("DTSTART"), "DTSTART")?
        .ok_or_else(|| CateZileError::IcsParse("VEVENT has no DTSTART".into()))?;
    let end = utc_prop(vevent.find_prop("DTEND"), "DTEND")?;
    let url = vevent.find_prop("URL").map(|p| unescape_text(p.val.as_ref()));

    CalendarEvent::new(title, start, end, url)
}

/// Parse an optional UTC basic-format property value.
fn utc_prop(prop: Option<&Property<'_>>, name: &str) -> CateZileResult<Option<DateTime<Utc>>> {
    let Some(prop) = prop else {
        return Ok(None);
    };
    let value: &str = prop.val.as_ref();
    NaiveDateTime::parse_from_str(value, ICS_UTC_FORMAT)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| CateZileError::IcsParse(format!("Invalid {} '{}': {}", name, value, e)))
}

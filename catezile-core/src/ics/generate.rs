//! ICS file generation.

use chrono::{DateTime, Utc};

use crate::format::{escape_text, format_utc_basic};
use crate::ics::CalendarEvent;

/// RFC 5545 content lines are limited to 75 octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

/// Identity stamped into every exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Goes into `PRODID:-//<product_id>//EN`
    pub product_id: String,
    /// Suffix of every `UID`
    pub uid_domain: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            product_id: "CateZile.ro".to_string(),
            uid_domain: "catezile.ro".to_string(),
        }
    }
}

/// Generate a single-event calendar file with the default identity.
pub fn build_calendar_file(event: &CalendarEvent, now: DateTime<Utc>) -> String {
    build_calendar_file_with(event, now, &ExportOptions::default())
}

/// Generate a single-event calendar file.
///
/// `now` is the generation time: it becomes `DTSTAMP` and the UID prefix, so
/// two exports in the same millisecond share a UID.
pub fn build_calendar_file_with(
    event: &CalendarEvent,
    now: DateTime<Utc>,
    options: &ExportOptions,
) -> String {
    let mut out = String::with_capacity(512);

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:-//{}//EN", options.product_id));
    push_line(&mut out, "BEGIN:VEVENT");
    push_line(
        &mut out,
        &format!("UID:{}@{}", now.timestamp_millis(), options.uid_domain),
    );
    push_line(&mut out, &format!("DTSTAMP:{}", format_utc_basic(now)));
    push_line(&mut out, &format!("DTSTART:{}", format_utc_basic(event.start())));
    push_line(&mut out, &format!("DTEND:{}", format_utc_basic(event.effective_end())));
    push_line(&mut out, &format!("SUMMARY:{}", escape_text(event.title())));
    if let Some(url) = event.url() {
        push_line(&mut out, &format!("URL:{}", escape_text(url)));
    }
    push_line(&mut out, "END:VEVENT");
    push_line(&mut out, "END:VCALENDAR");

    out
}

/// Append a content line, folding it at 75 octets without splitting a UTF-8 character.
fn push_line(out: &mut String, line: &str) {
    let mut used = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if used + len > MAX_LINE_OCTETS {
            // Continuation lines start with a single space, which counts toward the limit
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(ch);
        used += len;
    }
    out.push_str("\r\n");
}

//! The event shape handed to the exporter.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{CateZileError, CateZileResult};
use crate::instant::InstantInput;

/// Span used when an event has no explicit end.
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

/// An event to export. Built on demand, never persisted.
///
/// `end`, when present, is never before `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    title: String,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    url: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        url: Option<String>,
    ) -> CateZileResult<Self> {
        if let Some(end) = end.filter(|end| *end < start) {
            return Err(CateZileError::invalid(format!(
                "Event end ({}) is before its start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        if end.is_none() && default_end(start).is_none() {
            return Err(CateZileError::invalid(format!(
                "Event start ({}) leaves no room for the default one-hour span",
                start.to_rfc3339()
            )));
        }

        Ok(CalendarEvent {
            title: title.into(),
            start,
            end,
            url: url.filter(|u| !u.trim().is_empty()),
        })
    }

    /// Build from unparsed instants (site timezone for offset-less strings).
    pub fn parse(
        title: impl Into<String>,
        start: impl Into<InstantInput>,
        end: Option<InstantInput>,
        url: Option<String>,
    ) -> CateZileResult<Self> {
        let start = start.into().resolve()?;
        let end = end.map(|e| e.resolve()).transpose()?;
        CalendarEvent::new(title, start, end, url)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The explicit end, or start plus one hour.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end
            .or_else(|| default_end(self.start))
            .unwrap_or(self.start)
    }
}

fn default_end(start: DateTime<Utc>) -> Option<DateTime<Utc>> {
    start.checked_add_signed(Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES))
}

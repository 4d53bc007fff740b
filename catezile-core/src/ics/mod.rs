//! Calendar-file export and re-import.
//!
//! Produces a single-event RFC 5545 payload for download into external
//! calendar applications, and reads one back.

mod event;
mod generate;
mod parse;

pub use event::{CalendarEvent, DEFAULT_EVENT_DURATION_MINUTES};
pub use generate::{ExportOptions, build_calendar_file, build_calendar_file_with};
pub use parse::parse_calendar_file;

//! Core logic for catezile.
//!
//! Pure, synchronous building blocks for a countdown site:
//! - `instant` parses the representations an instant arrives in
//! - `format` renders instants for display (Romanian locale, site timezone)
//! - `countdown` computes the live countdown state for a target
//! - `ics` exports an event as a calendar file
//! - `source` translates external feed items into typed targets
//! - `config` loads site settings

pub mod config;
pub mod countdown;
pub mod error;
pub mod format;
pub mod ics;
pub mod instant;
pub mod source;

pub use countdown::{CountdownState, TimeLeft, compute_state, decompose};
pub use error::{CateZileError, CateZileResult};
pub use ics::{CalendarEvent, build_calendar_file};
pub use instant::{InstantInput, parse_instant};
